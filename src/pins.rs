//! GPIO assignments for the LiftSwitch board.
//!
//! Single source of truth: drivers and the default config reference this
//! module rather than hard-coding pin numbers.

/// Relay drive output.  On dev boards this is the built-in LED (active HIGH),
/// standing in for the lift relay coil driver.
pub const RELAY_GPIO: i32 = 2;
