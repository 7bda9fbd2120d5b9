//! Fuzz target: `decode_response`
//!
//! Drives arbitrary bodies into the poll response decoder and asserts that
//! it never panics and that anything it accepts is a complete, in-range
//! mode state.
//!
//! cargo fuzz run fuzz_poll_response

#![no_main]

use libfuzzer_sys::fuzz_target;
use liftswitch::fsm::Mode;
use liftswitch::rpc::codec::{decode_response, MAX_RESPONSE_SIZE};

fuzz_target!(|data: &[u8]| {
    let Some(state) = decode_response(data) else {
        return;
    };
    assert!(data.len() <= MAX_RESPONSE_SIZE, "oversized body accepted");
    assert!(matches!(state.mode, Mode::Off | Mode::Pulse | Mode::Continuous));
    if let Some(v) = &state.valid_until {
        assert!(v.len() <= 40);
    }

    // Decoding is deterministic.
    assert_eq!(decode_response(data), Some(state));
});
