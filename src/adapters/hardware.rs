//! Hardware adapter: bridges the relay GPIO to [`OutputPort`].
//!
//! Generic over any `embedded-hal` [`OutputPin`], so the same adapter runs
//! on an ESP-IDF `PinDriver` in production and on a mock pin in tests.
//! This is the only module in the system that touches the actuator.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::OutputPort;

/// Digital output driving the relay / actuator line.
pub struct RelayOutput<P> {
    pin: P,
    level: PinState,
}

impl<P: OutputPin> RelayOutput<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            warn!("Relay: initial set_low failed: {:?}", e);
        }
        Self {
            pin,
            level: PinState::Low,
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> OutputPort for RelayOutput<P> {
    fn set_level(&mut self, level: PinState) {
        match self.pin.set_state(level) {
            Ok(()) => self.level = level,
            // Level stays unchanged so the next tick retries the write.
            Err(e) => warn!("Relay: write {:?} failed: {:?}", level, e),
        }
    }

    fn level(&self) -> PinState {
        self.level
    }
}
