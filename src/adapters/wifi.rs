//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity, on top of a [`StationDriver`] and an `embedded-hal`
//! [`DelayNs`] used to wait between association polls.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"` with the `espidf` feature**: [`EspStation`] drives `esp_idf_svc::wifi`.
//! - **all other targets**: tests plug in their own `StationDriver`.
//!
//! ## Reconnection policy
//!
//! A connect attempt starts association, then polls it up to
//! `RetryPolicy::attempts` times, `RetryPolicy::delay_ms` apart.  On
//! exhaustion the adapter reports `Disconnected` and the scheduler loop
//! simply tries again on its next tick.  There is no terminal failure state.

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::ports::{ConnectivityPort, LinkStatus};
use crate::config::{DeviceConfig, WifiCredentials};
use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Station driver
// ───────────────────────────────────────────────────────────────

/// The radio underneath the adapter.
pub trait StationDriver {
    /// Configure credentials and start (non-blocking) association.
    fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), LinkError>;

    /// Associated and holding an IP address.
    fn is_associated(&self) -> bool;

    fn local_ip(&self) -> Option<Ipv4Addr>;

    fn disconnect(&mut self);
}

/// Bound and spacing of association polls within one connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            attempts: config.wifi_connect_attempts,
            delay_ms: config.wifi_retry_delay_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            delay_ms: 500,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter<S, D> {
    station: S,
    delay: D,
    policy: RetryPolicy,
    status: LinkStatus,
    ip: Option<Ipv4Addr>,
    last_error: Option<LinkError>,
}

impl<S: StationDriver, D: DelayNs> WifiAdapter<S, D> {
    pub fn new(station: S, delay: D, policy: RetryPolicy) -> Self {
        Self {
            station,
            delay,
            policy,
            status: LinkStatus::Disconnected,
            ip: None,
            last_error: None,
        }
    }

    pub fn station(&self) -> &S {
        &self.station
    }

    pub fn station_mut(&mut self) -> &mut S {
        &mut self.station
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl<S: StationDriver, D: DelayNs> ConnectivityPort for WifiAdapter<S, D> {
    fn is_ready(&mut self) -> bool {
        if self.status != LinkStatus::Connected {
            return false;
        }
        if self.station.is_associated() {
            return true;
        }
        warn!("WiFi: connection lost, reconnecting");
        self.status = LinkStatus::Disconnected;
        self.ip = None;
        false
    }

    fn attempt_connect(&mut self, credentials: &WifiCredentials) -> LinkStatus {
        info!("WiFi: connecting to '{}'", credentials.ssid);
        self.status = LinkStatus::Connecting;
        self.last_error = None;

        if let Err(e) = self.station.begin(credentials) {
            error!("WiFi: {}", e);
            self.status = LinkStatus::Disconnected;
            self.last_error = Some(e);
            return self.status;
        }

        let mut polls = 0;
        while !self.station.is_associated() && polls < self.policy.attempts {
            self.delay.delay_ms(self.policy.delay_ms);
            polls += 1;
        }

        if self.station.is_associated() {
            self.status = LinkStatus::Connected;
            self.ip = self.station.local_ip();
            match self.ip {
                Some(ip) => info!("WiFi: connected, IP address {}", ip),
                None => info!("WiFi: connected"),
            }
        } else {
            let e = LinkError::AttemptsExhausted { attempts: polls };
            warn!("WiFi: {}", e);
            self.station.disconnect();
            self.status = LinkStatus::Disconnected;
            self.last_error = Some(e);
        }
        self.status
    }

    fn status(&self) -> LinkStatus {
        self.status
    }

    fn network_identity(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    fn last_error(&self) -> Option<LinkError> {
        self.last_error
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF station
// ───────────────────────────────────────────────────────────────

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub use esp::EspStation;

#[cfg(all(target_os = "espidf", feature = "espidf"))]
mod esp {
    use core::net::Ipv4Addr;

    use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
    use log::warn;

    use super::StationDriver;
    use crate::config::WifiCredentials;
    use crate::error::LinkError;

    /// STA-mode wrapper around the ESP-IDF WiFi driver.
    pub struct EspStation {
        wifi: EspWifi<'static>,
    }

    impl EspStation {
        pub fn new(wifi: EspWifi<'static>) -> Self {
            Self { wifi }
        }
    }

    impl StationDriver for EspStation {
        fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), LinkError> {
            let conf = Configuration::Client(ClientConfiguration {
                ssid: credentials
                    .ssid
                    .as_str()
                    .try_into()
                    .map_err(|()| LinkError::StationStart)?,
                password: credentials
                    .password
                    .as_str()
                    .try_into()
                    .map_err(|()| LinkError::StationStart)?,
                auth_method: if credentials.is_open() {
                    AuthMethod::None
                } else {
                    AuthMethod::WPA2Personal
                },
                ..Default::default()
            });

            self.wifi.set_configuration(&conf).map_err(|e| {
                warn!("WiFi(espidf): set_configuration failed: {}", e);
                LinkError::StationStart
            })?;
            if !self.wifi.is_started().unwrap_or(false) {
                self.wifi.start().map_err(|e| {
                    warn!("WiFi(espidf): start failed: {}", e);
                    LinkError::StationStart
                })?;
            }
            // A stale association attempt blocks a new connect.
            let _ = self.wifi.disconnect();
            self.wifi.connect().map_err(|e| {
                warn!("WiFi(espidf): connect failed: {}", e);
                LinkError::StationStart
            })
        }

        fn is_associated(&self) -> bool {
            self.wifi.is_up().unwrap_or(false)
        }

        fn local_ip(&self) -> Option<Ipv4Addr> {
            self.wifi.sta_netif().get_ip_info().ok().map(|info| info.ip)
        }

        fn disconnect(&mut self) {
            let _ = self.wifi.disconnect();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
