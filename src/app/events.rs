//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them (serial log, test recorder).

use core::net::Ipv4Addr;

use embedded_hal::digital::PinState;

use crate::error::{LinkError, PollError};
use crate::fsm::{Mode, ModeState, PulseEdge};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started with this output level.
    Started(PinState),

    /// A connect attempt succeeded.
    LinkUp(Option<Ipv4Addr>),

    /// A connect attempt gave up; retried on a later tick.
    LinkFailed(LinkError),

    /// A poll returned a fresh mode state.
    PollSucceeded(ModeState),

    /// A poll failed; the mode state was left unchanged.
    PollFailed(PollError),

    /// The mode differs from the previous tick's.
    ModeChanged { from: Mode, to: Mode },

    /// A pulse started or ended.
    Pulse(PulseEdge),

    /// The output level was written.
    OutputChanged(PinState),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// Point-in-time counters suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub uptime_ms: u64,
    pub mode: Mode,
    pub level: PinState,
    pub link_ready: bool,
    pub polls_ok: u32,
    pub polls_failed: u32,
    pub connect_attempts: u32,
    pub output_edges: u32,
}
