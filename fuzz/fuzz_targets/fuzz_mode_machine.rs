//! Fuzz target: `ModeMachine::step`
//!
//! Interprets the input as a sequence of (mode, interval, on-time, delta)
//! records and steps the machine through them with a non-decreasing clock.
//! Asserts the level is always consistent with the mode and phase.
//!
//! cargo fuzz run fuzz_mode_machine

#![no_main]

use embedded_hal::digital::PinState;
use libfuzzer_sys::fuzz_target;
use liftswitch::fsm::{Mode, ModeMachine, ModeState, PulsePhase};

fuzz_target!(|data: &[u8]| {
    let mut machine = ModeMachine::new();
    let mut now: u64 = 0;

    for rec in data.chunks_exact(6) {
        let mode = match rec[0] % 3 {
            0 => Mode::Off,
            1 => Mode::Pulse,
            _ => Mode::Continuous,
        };
        let state = ModeState {
            mode,
            pulse_interval_secs: u32::from(rec[1] % 16),
            pulse_on_ms: u32::from(u16::from_le_bytes([rec[2], rec[3]])),
            valid_until: None,
        };
        now += u64::from(u16::from_le_bytes([rec[4], rec[5]]));

        let step = machine.step(&state, now);
        match mode {
            Mode::Off => {
                assert_eq!(step.level, PinState::Low);
                assert_eq!(machine.timer().phase, PulsePhase::Idle);
            }
            Mode::Continuous => assert_eq!(step.level, PinState::High),
            Mode::Pulse => {
                let high = machine.timer().phase == PulsePhase::Active;
                assert_eq!(step.level == PinState::High, high);
            }
        }
        assert_eq!(machine.prev_mode(), mode);
    }
});
