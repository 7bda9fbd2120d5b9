//! Controller service: the hexagonal core.
//!
//! [`ControllerService`] owns the mode state, the mode machine and the poll
//! cadence.  One call to [`tick`](ControllerService::tick) is one pass of the
//! cooperative scheduler loop.  All I/O flows through port traits injected
//! at call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  ConnectivityPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!     HttpTransport ──▶ │    ControllerService     │
//!             Clock ──▶ │ Cadence · Poll · ModeFSM │ ──▶ OutputPort
//!                       └──────────────────────────┘
//! ```
//!
//! Per tick:
//! 1. link not ready → one bounded connect attempt, rest of tick skipped
//!    (the output keeps its last level);
//! 2. poll cadence due → poll, replacing the mode state only on success;
//! 3. re-read the clock, step the mode machine, apply the level.

use embedded_hal::digital::PinState;
use log::info;

use crate::config::{DeviceConfig, WifiCredentials};
use crate::error::{ConfigError, PollError};
use crate::fsm::{ModeMachine, ModeState};
use crate::rpc::client::PollClient;
use crate::rpc::transport::HttpTransport;
use crate::scheduler::Cadence;

use super::events::{AppEvent, TelemetryData};
use super::ports::{Clock, ConnectivityPort, EventSink, LinkStatus, OutputPort};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The link was down: a connect attempt ran and the rest of the tick
    /// was skipped.
    Reconnect(LinkStatus),
    /// The mode machine ran.  `poll` is `Some` when a poll was attempted.
    Evaluated {
        poll: Option<Result<(), PollError>>,
        level: PinState,
    },
}

/// Running counters, reported through telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub polls_ok: u32,
    pub polls_failed: u32,
    pub connect_attempts: u32,
    pub output_edges: u32,
}

pub struct ControllerService {
    credentials: WifiCredentials,
    client: PollClient,
    poll_cadence: Cadence,
    telemetry_cadence: Cadence,
    mode_state: ModeState,
    machine: ModeMachine,
    stats: ControllerStats,
    started_at_ms: u64,
}

impl ControllerService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the output; call [`start`](Self::start) next.
    pub fn new(config: &DeviceConfig) -> Result<Self, ConfigError> {
        let telemetry_ms = u64::from(config.telemetry_interval_secs) * 1000;
        Ok(Self {
            credentials: config.wifi.clone(),
            client: PollClient::new(config)?,
            poll_cadence: Cadence::new(u64::from(config.poll_interval_ms)),
            telemetry_cadence: Cadence::starting_at(telemetry_ms, 0),
            mode_state: ModeState::default(),
            machine: ModeMachine::new(),
            stats: ControllerStats::default(),
            started_at_ms: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the output low and anchor the telemetry cadence.
    pub fn start(
        &mut self,
        clock: &impl Clock,
        output: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        let now = clock.now_ms();
        self.started_at_ms = now;
        self.telemetry_cadence = Cadence::starting_at(self.telemetry_cadence.interval_ms(), now);
        output.set_level(PinState::Low);
        sink.emit(&AppEvent::Started(PinState::Low));
        info!("Controller started, polling {}", self.client.url());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scheduler tick.  Never fails: every error is emitted as an
    /// event and retried on a later tick.
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        link: &mut impl ConnectivityPort,
        transport: &mut impl HttpTransport,
        output: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        // 1. Connectivity gate
        if !link.is_ready() {
            self.stats.connect_attempts = self.stats.connect_attempts.saturating_add(1);
            let status = link.attempt_connect(&self.credentials);
            match status {
                LinkStatus::Connected => sink.emit(&AppEvent::LinkUp(link.network_identity())),
                _ => {
                    if let Some(e) = link.last_error() {
                        sink.emit(&AppEvent::LinkFailed(e));
                    }
                }
            }
            self.maybe_emit_telemetry(clock.now_ms(), false, sink);
            return TickOutcome::Reconnect(status);
        }

        // 2. Poll on cadence
        let poll = self
            .poll_cadence
            .fire_if_due(clock.now_ms())
            .then(|| self.poll(transport, sink));

        // 3. Mode machine, evaluated after any network I/O has completed
        let now = clock.now_ms();
        let step = self.machine.step(&self.mode_state, now);
        if let Some((from, to)) = step.mode_change {
            sink.emit(&AppEvent::ModeChanged { from, to });
        }
        if let Some(edge) = step.edge {
            sink.emit(&AppEvent::Pulse(edge));
        }
        if output.level() != step.level {
            output.set_level(step.level);
            self.stats.output_edges = self.stats.output_edges.saturating_add(1);
            sink.emit(&AppEvent::OutputChanged(step.level));
        }

        self.maybe_emit_telemetry(now, true, sink);
        TickOutcome::Evaluated {
            poll,
            level: step.level,
        }
    }

    fn poll(
        &mut self,
        transport: &mut impl HttpTransport,
        sink: &mut impl EventSink,
    ) -> Result<(), PollError> {
        match self.client.poll(transport) {
            Ok(state) => {
                self.stats.polls_ok = self.stats.polls_ok.saturating_add(1);
                sink.emit(&AppEvent::PollSucceeded(state.clone()));
                self.mode_state = state;
                Ok(())
            }
            Err(e) => {
                self.stats.polls_failed = self.stats.polls_failed.saturating_add(1);
                sink.emit(&AppEvent::PollFailed(e));
                Err(e)
            }
        }
    }

    fn maybe_emit_telemetry(&mut self, now: u64, link_ready: bool, sink: &mut impl EventSink) {
        if self.telemetry_cadence.fire_if_due(now) {
            let t = self.build_telemetry(now, link_ready);
            sink.emit(&AppEvent::Telemetry(t));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self, now: u64, link_ready: bool) -> TelemetryData {
        TelemetryData {
            uptime_ms: now.saturating_sub(self.started_at_ms),
            mode: self.mode_state.mode,
            level: self.last_level(),
            link_ready,
            polls_ok: self.stats.polls_ok,
            polls_failed: self.stats.polls_failed,
            connect_attempts: self.stats.connect_attempts,
            output_edges: self.stats.output_edges,
        }
    }

    /// Last server-sourced mode state.
    pub fn mode_state(&self) -> &ModeState {
        &self.mode_state
    }

    pub fn machine(&self) -> &ModeMachine {
        &self.machine
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Fire time of the last poll attempt, successful or not.
    pub fn last_poll_ms(&self) -> Option<u64> {
        self.poll_cadence.last_fire_ms()
    }

    fn last_level(&self) -> PinState {
        use crate::fsm::{Mode, PulsePhase};
        match (self.machine.prev_mode(), self.machine.timer().phase) {
            (Mode::Continuous, _) | (Mode::Pulse, PulsePhase::Active) => PinState::High,
            _ => PinState::Low,
        }
    }
}
