//! Device configuration.
//!
//! Everything here is fixed at build time: credentials and server identity
//! come from `LIFTSWITCH_*` environment variables captured by `option_env!`,
//! falling back to bench defaults.  Nothing is persisted on the device.

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

pub const SSID_CAPACITY: usize = 32;
pub const PASSWORD_CAPACITY: usize = 64;
pub const URL_CAPACITY: usize = 128;
pub const DEVICE_ID_CAPACITY: usize = 64;
pub const DEVICE_KEY_CAPACITY: usize = 64;

const DEFAULT_SSID: &str = "YourWiFiSSID";
const DEFAULT_PASSWORD: &str = "YourWiFiPassword";
const DEFAULT_SERVER_URL: &str = "http://192.168.1.100:3000/api";
const DEFAULT_DEVICE_ID: &str = "default";
const DEFAULT_DEVICE_KEY: &str = "test-device-key-12345";

// ---------------------------------------------------------------------------
// WiFi credentials
// ---------------------------------------------------------------------------

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: heapless::String<SSID_CAPACITY>,
    pub password: heapless::String<PASSWORD_CAPACITY>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        Ok(Self {
            ssid: bounded(ssid, "ssid")?,
            password: bounded(password, "password")?,
        })
    }

    /// An empty password selects an open network.
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() || ssid.len() > SSID_CAPACITY || !is_printable_ascii(ssid) {
        return Err(ConfigError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConfigError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > PASSWORD_CAPACITY {
        return Err(ConfigError::InvalidPassword);
    }
    Ok(())
}

/// Path segments go into the poll URL verbatim, so only unreserved
/// characters (RFC 3986 §2.3) are accepted.
fn is_url_safe(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

fn bounded<const N: usize>(
    s: &str,
    field: &'static str,
) -> Result<heapless::String<N>, ConfigError> {
    let mut out = heapless::String::new();
    out.push_str(s).map_err(|()| ConfigError::TooLong(field))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Device configuration
// ---------------------------------------------------------------------------

/// Complete device configuration.
/// Transport security for the poll connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// `http://`, no TLS.
    Plain,
    /// `https://`, server chain verified against the ESP-IDF bundle.
    CertBundle,
    /// `https://` with no CA attached, so the server is not verified.
    Unverified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Network ---
    pub wifi: WifiCredentials,
    /// Association polls per connect attempt before giving up.
    pub wifi_connect_attempts: u32,
    /// Wait between association polls (milliseconds).
    pub wifi_retry_delay_ms: u32,

    // --- Control server ---
    /// Base URL, e.g. `https://lift.example.com/api` (no trailing path).
    pub server_url: heapless::String<URL_CAPACITY>,
    pub device_id: heapless::String<DEVICE_ID_CAPACITY>,
    /// Static shared secret sent with every poll.
    pub device_key: heapless::String<DEVICE_KEY_CAPACITY>,
    /// Accept any `https://` server certificate instead of verifying it
    /// against the certificate bundle.  Needs the ESP-TLS insecure options
    /// from `sdkconfig.defaults`.
    pub tls_skip_server_verify: bool,
    /// Per-request HTTP timeout (milliseconds).
    pub http_timeout_ms: u32,

    // --- Output ---
    pub relay_gpio: i32,

    // --- Timing ---
    /// Minimum spacing between poll attempts (milliseconds).
    pub poll_interval_ms: u32,
    /// End-of-tick yield (milliseconds).
    pub tick_interval_ms: u32,
    /// Telemetry summary interval (seconds).
    pub telemetry_interval_secs: u32,
    /// Task watchdog timeout (milliseconds).
    pub watchdog_timeout_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            wifi: WifiCredentials {
                ssid: heapless::String::try_from(DEFAULT_SSID).unwrap_or_default(),
                password: heapless::String::try_from(DEFAULT_PASSWORD).unwrap_or_default(),
            },
            wifi_connect_attempts: 30,
            wifi_retry_delay_ms: 500,

            server_url: heapless::String::try_from(DEFAULT_SERVER_URL).unwrap_or_default(),
            device_id: heapless::String::try_from(DEFAULT_DEVICE_ID).unwrap_or_default(),
            device_key: heapless::String::try_from(DEFAULT_DEVICE_KEY).unwrap_or_default(),
            tls_skip_server_verify: false,
            http_timeout_ms: 5_000,

            relay_gpio: pins::RELAY_GPIO,

            poll_interval_ms: 1_000,       // 1 Hz
            tick_interval_ms: 10,          // 100 Hz
            telemetry_interval_secs: 60,   // 1/min
            watchdog_timeout_ms: 30_000,
        }
    }
}

impl DeviceConfig {
    /// Build the configuration from `LIFTSWITCH_*` variables baked in at
    /// compile time, then validate it.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.wifi = WifiCredentials::new(
            option_env!("LIFTSWITCH_WIFI_SSID").unwrap_or(DEFAULT_SSID),
            option_env!("LIFTSWITCH_WIFI_PASSWORD").unwrap_or(DEFAULT_PASSWORD),
        )?;
        config.server_url = bounded(
            option_env!("LIFTSWITCH_SERVER_URL").unwrap_or(DEFAULT_SERVER_URL),
            "server_url",
        )?;
        config.device_id = bounded(
            option_env!("LIFTSWITCH_DEVICE_ID").unwrap_or(DEFAULT_DEVICE_ID),
            "device_id",
        )?;
        config.device_key = bounded(
            option_env!("LIFTSWITCH_DEVICE_KEY").unwrap_or(DEFAULT_DEVICE_KEY),
            "device_key",
        )?;
        config.tls_skip_server_verify =
            option_env!("LIFTSWITCH_TLS_INSECURE").is_some_and(|v| v == "1");

        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ssid(&self.wifi.ssid)?;
        validate_password(&self.wifi.password)?;

        let url = self.server_url.as_str();
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or(ConfigError::InvalidServerUrl)?;
        if host.is_empty() || !is_printable_ascii(url) || url.contains(' ') {
            return Err(ConfigError::InvalidServerUrl);
        }

        if self.device_id.is_empty() || !is_url_safe(&self.device_id) {
            return Err(ConfigError::InvalidDeviceId);
        }
        if self.device_key.is_empty() {
            return Err(ConfigError::MissingDeviceKey);
        }

        if self.poll_interval_ms == 0 || self.tick_interval_ms == 0 {
            return Err(ConfigError::Timing("poll and tick intervals must be non-zero"));
        }
        if self.tick_interval_ms >= self.poll_interval_ms {
            return Err(ConfigError::Timing("tick must be shorter than the poll interval"));
        }
        if self.wifi_connect_attempts == 0 {
            return Err(ConfigError::Timing("at least one association poll is required"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::Timing("telemetry interval must be non-zero"));
        }
        if u64::from(self.watchdog_timeout_ms) <= self.worst_case_blocking_ms() {
            return Err(ConfigError::Timing(
                "watchdog must outlast a connect attempt plus one HTTP request",
            ));
        }
        Ok(())
    }

    /// Upper bound on the time between two watchdog feeds: a full connect
    /// attempt, one HTTP timeout and the end-of-tick yield.
    pub fn worst_case_blocking_ms(&self) -> u64 {
        let connect =
            u64::from(self.wifi_connect_attempts) * u64::from(self.wifi_retry_delay_ms);
        connect + u64::from(self.http_timeout_ms) + u64::from(self.tick_interval_ms)
    }

    pub fn uses_tls(&self) -> bool {
        self.server_url.starts_with("https://")
    }

    /// How the poll connection is secured.
    pub fn tls_mode(&self) -> TlsMode {
        match (self.uses_tls(), self.tls_skip_server_verify) {
            (false, _) => TlsMode::Plain,
            (true, false) => TlsMode::CertBundle,
            (true, true) => TlsMode::Unverified,
        }
    }

    /// Full poll endpoint: `<server_url>/devices/<device_id>/poll`.
    pub fn poll_url<const N: usize>(&self) -> Result<heapless::String<N>, ConfigError> {
        let mut url = heapless::String::new();
        write!(
            url,
            "{}/devices/{}/poll",
            self.server_url.trim_end_matches('/'),
            self.device_id
        )
        .map_err(|_| ConfigError::TooLong("poll url"))?;
        Ok(url)
    }
}
