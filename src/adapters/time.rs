//! ESP32 time adapter.
//!
//! Implements [`Clock`] with a monotonic millisecond counter.
//!
//! - **`target_os = "espidf"` + `espidf` feature**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microseconds since boot).
//! - **anything else**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! The counter is 64-bit, so the wraparound that plagues a 32-bit
//! `millis()` never happens within the device's lifetime.

use crate::app::ports::Clock;

pub struct Esp32TimeAdapter {
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        // Never negative: the timer starts at zero on boot.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }).max(0) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn uptime_us(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Clock for Esp32TimeAdapter {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }
}
