//! Peripheral helpers owned by the scheduler loop.

pub mod watchdog;
