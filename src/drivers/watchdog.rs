//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the scheduler loop
//! stalls.  The timeout comes from `DeviceConfig::watchdog_timeout_ms`;
//! `DeviceConfig::validate` already guarantees it outlasts the longest
//! blocking stretch of a tick.
//!
//! The scheduler loop calls `feed()` once per tick.

#[cfg(all(target_os = "espidf", feature = "espidf"))]
use esp_idf_svc::sys::{ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset};

use log::info;
#[cfg(all(target_os = "espidf", feature = "espidf"))]
use log::warn;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(all(target_os = "espidf", feature = "espidf"))]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    warn!("TWDT reconfigure returned {} (may already be configured)", ret);
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({}ms timeout, panic on trigger)", timeout_ms);
                } else {
                    warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
        {
            info!("Watchdog(sim): no-op ({}ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog.  Must be called more often than the timeout.
    pub fn feed(&self) {
        #[cfg(all(target_os = "espidf", feature = "espidf"))]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
