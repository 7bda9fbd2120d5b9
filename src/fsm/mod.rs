//! Output mode state machine.
//!
//! ```text
//!            mode change (any → any): timer ← {Idle, cycle_start = now}
//!
//!   ┌─────┐        ┌──────────────── Pulse ────────────────┐   ┌────────────┐
//!   │ Off │        │  Idle ── now-cycle_start ≥ interval ─▶ │   │ Continuous │
//!   │ low │        │   ▲                          Active   │   │    high    │
//!   └─────┘        │   └──── now-pulse_start ≥ on_ms ──┘   │   └────────────┘
//!                  └───────────────────────────────────────┘
//! ```
//!
//! [`ModeMachine::step`] is a pure function of the current [`ModeState`],
//! the machine's own [`PulseTimer`] and the timestamp.  It never blocks and
//! runs in constant time, so it is evaluated on every scheduler tick
//! regardless of what the network is doing.

pub mod state;

use embedded_hal::digital::PinState;

pub use state::{Mode, ModeState, PulsePhase, PulseTimer};

/// Pulse boundary crossed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseEdge {
    Start,
    End,
}

/// Result of one [`ModeMachine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub level: PinState,
    /// `(from, to)` when the mode differs from the previous tick's.
    pub mode_change: Option<(Mode, Mode)>,
    pub edge: Option<PulseEdge>,
}

/// Owns the pulse timer and the mode observed on the previous tick.
#[derive(Debug, Clone)]
pub struct ModeMachine {
    timer: PulseTimer,
    prev_mode: Mode,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeMachine {
    /// Machine matching the boot-time [`ModeState::default`] (Off).
    pub fn new() -> Self {
        Self::with_timer(Mode::Off, PulseTimer::default())
    }

    /// Resume from an explicit timer and previous mode.
    pub fn with_timer(prev_mode: Mode, timer: PulseTimer) -> Self {
        Self { timer, prev_mode }
    }

    pub fn timer(&self) -> &PulseTimer {
        &self.timer
    }

    pub fn prev_mode(&self) -> Mode {
        self.prev_mode
    }

    /// Decide the output level for `now_ms`.
    pub fn step(&mut self, state: &ModeState, now_ms: u64) -> Step {
        let mut mode_change = None;
        if state.mode != self.prev_mode {
            mode_change = Some((self.prev_mode, state.mode));
            self.prev_mode = state.mode;
            self.timer.reset(now_ms);
        }

        let (level, edge) = match state.mode {
            Mode::Off => {
                self.timer.phase = PulsePhase::Idle;
                (PinState::Low, None)
            }
            Mode::Continuous => (PinState::High, None),
            Mode::Pulse => self.step_pulse(state, now_ms),
        };

        Step {
            level,
            mode_change,
            edge,
        }
    }

    fn step_pulse(&mut self, state: &ModeState, now_ms: u64) -> (PinState, Option<PulseEdge>) {
        match self.timer.phase {
            PulsePhase::Idle => {
                // A zero interval never elapses rather than firing every tick.
                let due = state
                    .pulse_interval_ms()
                    .is_some_and(|interval| elapsed(self.timer.cycle_start_ms, now_ms) >= interval);
                if due {
                    self.timer.phase = PulsePhase::Active;
                    self.timer.pulse_start_ms = now_ms;
                    self.timer.cycle_start_ms = now_ms;
                    (PinState::High, Some(PulseEdge::Start))
                } else {
                    (PinState::Low, None)
                }
            }
            PulsePhase::Active => {
                if elapsed(self.timer.pulse_start_ms, now_ms) >= u64::from(state.pulse_on_ms) {
                    self.timer.phase = PulsePhase::Idle;
                    (PinState::Low, Some(PulseEdge::End))
                } else {
                    (PinState::High, None)
                }
            }
        }
    }
}

/// Monotonic elapsed time; a timestamp from the future counts as zero.
fn elapsed(since_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(since_ms)
}
