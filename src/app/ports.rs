//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (link, clock, output pin, event sinks) implement these
//! traits; the HTTP channel has its own trait in
//! [`rpc::transport`](crate::rpc::transport).  The [`ControllerService`](super::service::ControllerService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use core::net::Ipv4Addr;

use embedded_hal::digital::PinState;

use crate::config::WifiCredentials;
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Connectivity port
// ───────────────────────────────────────────────────────────────

/// Link state as seen by the connectivity monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
}

pub trait ConnectivityPort {
    /// `true` when the link can carry a poll.  Also notices a dropped
    /// association and moves the status to `Disconnected`.
    fn is_ready(&mut self) -> bool;

    /// Bounded, blocking connect attempt.  Returns `Connected` or
    /// `Disconnected`; never loops forever.
    fn attempt_connect(&mut self, credentials: &WifiCredentials) -> LinkStatus;

    fn status(&self) -> LinkStatus;

    /// Address acquired by the last successful attempt (informational).
    fn network_identity(&self) -> Option<Ipv4Addr>;

    /// Why the last attempt failed, if it did.
    fn last_error(&self) -> Option<LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Clock & output ports
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The single binary output driven by the mode machine.
pub trait OutputPort {
    fn set_level(&mut self, level: PinState);

    fn level(&self) -> PinState;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
