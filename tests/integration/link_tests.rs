//! The WiFi adapter plugged into the controller: bounded connect attempts,
//! retry on later ticks, and link-loss detection.

use std::cell::Cell;
use std::net::Ipv4Addr;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use liftswitch::adapters::wifi::{RetryPolicy, StationDriver, WifiAdapter};
use liftswitch::app::events::AppEvent;
use liftswitch::app::ports::{Clock, ConnectivityPort, LinkStatus, OutputPort};
use liftswitch::app::service::{ControllerService, TickOutcome};
use liftswitch::config::{DeviceConfig, WifiCredentials};
use liftswitch::error::LinkError;

use super::mock_hw::{MockClock, MockOutput, MockServer, RecordingSink, Reply};

/// Radio that associates only once `reachable` is set.
struct FlakyStation {
    reachable: Rc<Cell<bool>>,
    begins: u32,
}

impl StationDriver for FlakyStation {
    fn begin(&mut self, _credentials: &WifiCredentials) -> Result<(), LinkError> {
        self.begins += 1;
        Ok(())
    }

    fn is_associated(&self) -> bool {
        self.reachable.get()
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        Some(Ipv4Addr::new(192, 168, 4, 20))
    }

    fn disconnect(&mut self) {}
}

/// Delay that advances the shared mock clock instead of sleeping.
struct ClockDelay(Rc<MockClock>);

impl DelayNs for ClockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

struct Harness {
    svc: ControllerService,
    clock: Rc<MockClock>,
    reachable: Rc<Cell<bool>>,
    link: WifiAdapter<FlakyStation, ClockDelay>,
    server: MockServer,
    output: MockOutput,
    sink: RecordingSink,
}

impl Harness {
    fn new() -> Self {
        let config = DeviceConfig {
            wifi_connect_attempts: 4,
            wifi_retry_delay_ms: 250,
            ..DeviceConfig::default()
        };
        let clock = MockClock::at(0);
        let reachable = Rc::new(Cell::new(false));
        let link = WifiAdapter::new(
            FlakyStation {
                reachable: reachable.clone(),
                begins: 0,
            },
            ClockDelay(clock.clone()),
            RetryPolicy::from_config(&config),
        );
        let mut svc = ControllerService::new(&config).unwrap();
        let mut output = MockOutput::new(clock.clone());
        let mut sink = RecordingSink::default();
        svc.start(&*clock, &mut output, &mut sink);
        Self {
            svc,
            reachable,
            link,
            server: MockServer::serving(Reply::mode("CONTINUOUS", 10, 500)),
            output,
            sink,
            clock,
        }
    }

    fn tick(&mut self) -> TickOutcome {
        self.svc.tick(
            &*self.clock,
            &mut self.link,
            &mut self.server,
            &mut self.output,
            &mut self.sink,
        )
    }
}

#[test]
fn unreachable_network_gives_up_after_bounded_wait() {
    let mut h = Harness::new();

    assert_eq!(h.tick(), TickOutcome::Reconnect(LinkStatus::Disconnected));
    // Four polls, 250 ms apart.
    assert_eq!(h.clock.now_ms(), 1_000);
    assert!(h.sink.events.contains(&AppEvent::LinkFailed(
        LinkError::AttemptsExhausted { attempts: 4 }
    )));
    assert_eq!(h.server.poll_count(), 0);
    assert_eq!(h.output.level(), PinState::Low);
}

#[test]
fn retries_on_every_tick_until_associated() {
    let mut h = Harness::new();
    h.tick();
    h.tick();
    h.reachable.set(true);

    assert_eq!(h.tick(), TickOutcome::Reconnect(LinkStatus::Connected));
    assert_eq!(h.link.station().begins, 3);
    assert_eq!(h.link.network_identity(), Some(Ipv4Addr::new(192, 168, 4, 20)));
    assert!(h.sink.events.contains(&AppEvent::LinkUp(Some(Ipv4Addr::new(192, 168, 4, 20)))));

    assert!(matches!(
        h.tick(),
        TickOutcome::Evaluated {
            poll: Some(Ok(())),
            level: PinState::High
        }
    ));
}

#[test]
fn lost_association_triggers_reconnect_and_holds_output() {
    let mut h = Harness::new();
    h.reachable.set(true);
    h.tick();
    h.tick();
    assert_eq!(h.output.level(), PinState::High);

    h.reachable.set(false);
    assert_eq!(h.tick(), TickOutcome::Reconnect(LinkStatus::Disconnected));
    assert_eq!(h.output.level(), PinState::High);
    assert_eq!(h.link.status(), LinkStatus::Disconnected);
    assert_eq!(h.svc.stats().connect_attempts, 2);
}
