//! LiftSwitch firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(all(target_os = "espidf", feature = "espidf"))]` within each
//! module, so an ESP target build without the `espidf` feature still
//! compiles the host stand-ins.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod rpc;
pub mod scheduler;

// Adapters and drivers compile on every target; their ESP-IDF halves are
// cfg-gated inside.
pub mod adapters;
pub mod drivers;
