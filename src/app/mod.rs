//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the mode controller together: connectivity gate,
//! poll cadence, mode machine and output.  All interaction with hardware
//! and the network happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
