//! Integration tests for the scheduler tick: link gate → poll cadence →
//! mode machine → output.

use embedded_hal::digital::PinState;
use liftswitch::app::events::AppEvent;
use liftswitch::app::ports::{LinkStatus, OutputPort};
use liftswitch::app::service::TickOutcome;
use liftswitch::error::{LinkError, PollError, TransportError};
use liftswitch::fsm::{Mode, PulsePhase};

use super::mock_hw::{MockLink, Reply, Rig};

// ── Boot and connectivity gate ───────────────────────────────

#[test]
fn boot_drives_output_low_before_any_network_activity() {
    let rig = Rig::new(MockLink::down(), Reply::mode("CONTINUOUS", 10, 500));
    assert_eq!(rig.output.writes, vec![(0, PinState::Low)]);
    assert_eq!(rig.sink.events[0], AppEvent::Started(PinState::Low));
    assert_eq!(rig.server.poll_count(), 0);
}

#[test]
fn no_poll_until_link_is_up() {
    let mut rig = Rig::new(MockLink::down(), Reply::mode("CONTINUOUS", 10, 500));
    rig.link.fail_next(2);

    assert_eq!(rig.tick(), TickOutcome::Reconnect(LinkStatus::Disconnected));
    assert_eq!(rig.tick(), TickOutcome::Reconnect(LinkStatus::Disconnected));
    assert_eq!(rig.tick(), TickOutcome::Reconnect(LinkStatus::Connected));
    assert_eq!(rig.server.poll_count(), 0);
    assert_eq!(rig.output.level(), PinState::Low);

    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::LinkFailed(LinkError::AttemptsExhausted { .. })
        )),
        2
    );
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::LinkUp(Some("10.0.0.7".parse().unwrap()))));

    // First tick on a live link polls immediately.
    assert_eq!(
        rig.tick(),
        TickOutcome::Evaluated {
            poll: Some(Ok(())),
            level: PinState::High,
        }
    );
    assert_eq!(rig.server.poll_count(), 1);
    assert_eq!(rig.svc.stats().connect_attempts, 3);
}

#[test]
fn link_drop_keeps_last_level_while_reconnecting() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("CONTINUOUS", 10, 500));
    rig.run_until(500, 10);
    assert_eq!(rig.output.level(), PinState::High);

    rig.link.drop_link();
    rig.link.fail_next(3);
    for _ in 0..3 {
        assert!(matches!(rig.tick(), TickOutcome::Reconnect(_)));
        assert_eq!(rig.output.level(), PinState::High);
    }
    assert_eq!(rig.tick(), TickOutcome::Reconnect(LinkStatus::Connected));
    assert_eq!(rig.output.writes.len(), 2);
}

// ── Poll cadence ─────────────────────────────────────────────

#[test]
fn polls_once_per_interval() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("OFF", 10, 500));
    rig.run_until(5_000, 10);
    assert_eq!(rig.server.poll_count(), 5);
    assert_eq!(rig.svc.last_poll_ms(), Some(4_000));
}

#[test]
fn failed_polls_do_not_shorten_the_interval() {
    let mut rig = Rig::new(MockLink::up(), Reply::Fail(TransportError::Connect));
    rig.run_until(5_000, 10);
    assert_eq!(rig.server.poll_count(), 5);
    assert_eq!(rig.svc.stats().polls_failed, 5);
}

#[test]
fn request_targets_device_poll_endpoint_with_key() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("OFF", 10, 500));
    rig.tick();
    let (url, body) = &rig.server.requests[0];
    assert_eq!(url, "http://192.168.1.100:3000/api/devices/default/poll");
    assert_eq!(body, r#"{"deviceKey":"test-device-key-12345"}"#);
}

// ── Poll failures leave the mode state alone ─────────────────

#[test]
fn transport_failure_keeps_previous_mode() {
    let mut rig = Rig::new(MockLink::up(), Reply::Fail(TransportError::Timeout));
    rig.server.then(Reply::mode("CONTINUOUS", 10, 500));
    rig.run_until(3_000, 10);

    assert_eq!(rig.svc.mode_state().mode, Mode::Continuous);
    assert_eq!(rig.output.level(), PinState::High);
    assert_eq!(rig.output.writes, vec![(0, PinState::Low), (0, PinState::High)]);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::PollFailed(PollError::Transport(TransportError::Timeout))),
        2
    );
}

#[test]
fn rejected_key_keeps_previous_mode() {
    let mut rig = Rig::new(
        MockLink::up(),
        Reply::Ok(401, r#"{"message":"Invalid device key"}"#.to_string()),
    );
    rig.server.then(Reply::mode("PULSE", 4, 250));
    rig.run_until(2_000, 10);

    let state = rig.svc.mode_state();
    assert_eq!(state.mode, Mode::Pulse);
    assert_eq!(state.pulse_interval_secs, 4);
    assert_eq!(state.pulse_on_ms, 250);
    assert!(rig.sink.events.contains(&AppEvent::PollFailed(PollError::Rejected(401))));
}

#[test]
fn malformed_and_oversized_bodies_are_ignored() {
    let mut rig = Rig::new(MockLink::up(), Reply::Ok(200, "x".repeat(600)));
    rig.server
        .then(Reply::mode("CONTINUOUS", 10, 500))
        .then(Reply::Ok(200, r#"{"mode":"SIDEWAYS"}"#.to_string()));
    rig.run_until(3_000, 10);

    assert_eq!(rig.svc.mode_state().mode, Mode::Continuous);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::PollFailed(PollError::Malformed)), 2);
}

// ── Mode changes ─────────────────────────────────────────────

#[test]
fn off_command_drops_output_on_the_polling_tick() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("OFF", 10, 500));
    rig.server.then(Reply::mode("CONTINUOUS", 10, 500));
    rig.run_until(1_500, 10);

    assert_eq!(
        rig.output.writes,
        vec![(0, PinState::Low), (0, PinState::High), (1_000, PinState::Low)]
    );
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Off,
        to: Mode::Continuous
    }));
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Continuous,
        to: Mode::Off
    }));
    assert_eq!(rig.svc.machine().timer().phase, PulsePhase::Idle);
}

#[test]
fn output_written_only_on_change() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("CONTINUOUS", 10, 500));
    rig.run_until(10_000, 10);
    assert_eq!(rig.output.writes.len(), 2);
    assert_eq!(rig.svc.stats().output_edges, 1);
}

#[test]
fn mode_machine_runs_after_poll_latency() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("PULSE", 1, 100));
    rig.server.clock = Some(rig.clock.clone());
    rig.server.latency_ms = 300;

    rig.tick();
    // The cycle is anchored at the post-poll time, not the tick start.
    assert_eq!(rig.svc.machine().timer().cycle_start_ms, 300);
    assert_eq!(rig.svc.last_poll_ms(), Some(0));
}

// ── Telemetry ────────────────────────────────────────────────

#[test]
fn telemetry_every_minute() {
    let mut rig = Rig::new(MockLink::up(), Reply::mode("OFF", 10, 500));
    rig.run_until(60_010, 10);

    let telemetry: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry.len(), 1);
    let t = telemetry[0];
    assert_eq!(t.uptime_ms, 60_000);
    assert_eq!(t.mode, Mode::Off);
    assert_eq!(t.level, PinState::Low);
    assert!(t.link_ready);
    assert_eq!(t.polls_ok, 61);
    assert_eq!(t.polls_failed, 0);
    assert_eq!(t.connect_attempts, 0);
}
