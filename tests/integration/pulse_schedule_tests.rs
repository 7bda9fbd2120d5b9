//! End-to-end pulse timing: server replies drive the output through the
//! full controller with a 10 ms tick.

use liftswitch::app::events::AppEvent;
use liftswitch::fsm::{Mode, PulseEdge};

use super::mock_hw::{MockLink, Reply, Rig};

fn rig_serving(replies: &[Reply], sticky: Reply) -> Rig {
    let mut rig = Rig::new(MockLink::up(), sticky);
    for r in replies {
        rig.server.then(r.clone());
    }
    rig
}

#[test]
fn pulses_once_per_interval() {
    let mut rig = rig_serving(&[], Reply::mode("PULSE", 2, 300));
    rig.run_until(6_000, 10);

    assert_eq!(rig.output.rising_edges(), vec![2_000, 4_000]);
    assert_eq!(rig.output.falling_edges(), vec![2_300, 4_300]);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Pulse(PulseEdge::Start)), 2);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Pulse(PulseEdge::End)), 2);
    // Identical replies are not mode changes.
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })), 1);
}

#[test]
fn returning_to_pulse_restarts_the_countdown() {
    let mut rig = rig_serving(
        &[Reply::mode("PULSE", 2, 300), Reply::mode("CONTINUOUS", 2, 300)],
        Reply::mode("PULSE", 2, 300),
    );
    rig.run_until(5_000, 10);

    assert_eq!(rig.output.rising_edges(), vec![1_000, 4_000]);
    assert_eq!(rig.output.falling_edges(), vec![2_000, 4_300]);
}

#[test]
fn new_interval_applies_to_running_cycle() {
    let mut rig = rig_serving(&[Reply::mode("PULSE", 3, 200)], Reply::mode("PULSE", 2, 200));
    rig.run_until(4_500, 10);

    assert_eq!(rig.output.rising_edges(), vec![2_000, 4_000]);
}

#[test]
fn zero_interval_never_pulses() {
    let mut rig = rig_serving(&[], Reply::mode("PULSE", 0, 500));
    rig.run_until(10_000, 10);

    assert!(rig.output.rising_edges().is_empty());
    assert_eq!(rig.svc.mode_state().mode, Mode::Pulse);
}

#[test]
fn on_time_longer_than_interval_fires_overdue_cycle_next_tick() {
    let mut rig = rig_serving(&[], Reply::mode("PULSE", 1, 1_500));
    rig.run_until(4_000, 10);

    assert_eq!(rig.output.rising_edges(), vec![1_000, 2_510]);
    assert_eq!(rig.output.falling_edges(), vec![2_500]);
}

#[test]
fn off_cuts_an_active_pulse_short() {
    let mut rig = rig_serving(
        &[Reply::mode("PULSE", 1, 1_500), Reply::mode("PULSE", 1, 1_500)],
        Reply::mode("OFF", 1, 1_500),
    );
    rig.run_until(3_000, 10);

    assert_eq!(rig.output.rising_edges(), vec![1_000]);
    assert_eq!(rig.output.falling_edges(), vec![2_000]);
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Pulse,
        to: Mode::Off
    }));
}

#[test]
fn negative_timings_are_clamped() {
    let mut rig = rig_serving(&[], Reply::mode("PULSE", -5, -100));
    rig.run_until(2_000, 10);

    let state = rig.svc.mode_state();
    assert_eq!(state.pulse_interval_secs, 0);
    assert_eq!(state.pulse_on_ms, 0);
    assert!(rig.output.rising_edges().is_empty());
}
