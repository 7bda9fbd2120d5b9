//! Mode state (the server-sourced description of desired output behaviour)
//! and the pulse timer the mode machine keeps alongside it.

/// Capacity of the `validUntil` timestamp (ISO-8601 with millis and offset).
pub const VALID_UNTIL_CAPACITY: usize = 40;

/// Server expiry timestamp, kept verbatim for diagnostics.
pub type ValidUntil = heapless::String<VALID_UNTIL_CAPACITY>;

/// Output mode requested by the control server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Output held low.
    #[default]
    Off,
    /// Output pulses high for `pulse_on_ms` once every `pulse_interval_secs`.
    Pulse,
    /// Output held high.
    Continuous,
}

impl Mode {
    /// Exhaustive wire mapping.  Unknown strings are not a mode.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "OFF" => Some(Self::Off),
            "PULSE" => Some(Self::Pulse),
            "CONTINUOUS" => Some(Self::Continuous),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Pulse => "PULSE",
            Self::Continuous => "CONTINUOUS",
        }
    }
}

/// Last state accepted from the control server.
///
/// Replaced wholesale after every successful poll; never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeState {
    pub mode: Mode,
    /// Pulse cycle length in seconds.  Zero means the pulse never fires.
    pub pulse_interval_secs: u32,
    /// How long the output stays high once a pulse starts.
    pub pulse_on_ms: u32,
    /// `None` means no expiry.
    pub valid_until: Option<ValidUntil>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: Mode::Off,
            pulse_interval_secs: 10,
            pulse_on_ms: 500,
            valid_until: None,
        }
    }
}

impl ModeState {
    /// Pulse cycle length in milliseconds, or `None` when the cycle can
    /// never elapse.
    pub fn pulse_interval_ms(&self) -> Option<u64> {
        match self.pulse_interval_secs {
            0 => None,
            secs => Some(u64::from(secs) * 1000),
        }
    }
}

// ---------------------------------------------------------------------------
// Pulse timer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulsePhase {
    /// Waiting for the cycle to elapse; output low.
    #[default]
    Idle,
    /// Pulse in progress; output high.
    Active,
}

/// Pulse bookkeeping, timestamps in milliseconds since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseTimer {
    pub phase: PulsePhase,
    /// Start of the current cycle (the tick that began the last pulse, or
    /// the tick the mode last changed).
    pub cycle_start_ms: u64,
    pub pulse_start_ms: u64,
}

impl PulseTimer {
    /// Fresh cycle anchored at `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        *self = Self {
            phase: PulsePhase::Idle,
            cycle_start_ms: now_ms,
            pulse_start_ms: now_ms,
        };
    }
}
