//! Typed error types for the LiftSwitch firmware, one per subsystem.
//!
//! Link and poll errors are recoverable: the scheduler loop logs them, leaves
//! the mode state as it was, and tries again on a later tick.  Config errors
//! stop the boot in `main`.  All variants are `Copy` so they can travel
//! through events without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The station never associated within the retry bound.
    AttemptsExhausted { attempts: u32 },
    /// The radio driver refused to start the association.
    StationStart,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptsExhausted { attempts } => {
                write!(f, "no association after {attempts} attempts")
            }
            Self::StationStart => write!(f, "station failed to start"),
        }
    }
}

impl core::error::Error for LinkError {}

// ---------------------------------------------------------------------------
// Poll errors
// ---------------------------------------------------------------------------

/// Outcome classes of a failed poll.  None of them touch the mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    /// No response came back (connect, TLS, timeout or I/O failure).
    Transport(TransportError),
    /// The server answered with a status other than 200.
    Rejected(u16),
    /// A 200 response whose body is not the expected shape.
    Malformed,
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure ({e})"),
            Self::Rejected(status) => write!(f, "server rejected poll with HTTP {status}"),
            Self::Malformed => write!(f, "malformed response body"),
        }
    }
}

impl core::error::Error for PollError {}

impl From<TransportError> for PollError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Connection (or TLS handshake) could not be established.
    Connect,
    /// Request or response I/O failed part way.
    Io,
    /// The server did not answer within the request timeout.
    Timeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect failed"),
            Self::Io => write!(f, "I/O error"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl core::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// SSID must be 1-32 printable ASCII bytes.
    InvalidSsid,
    /// Password must be empty (open network) or 8-64 bytes.
    InvalidPassword,
    /// Server URL must start with `http://` or `https://`.
    InvalidServerUrl,
    /// Device id must be non-empty and URL-safe.
    InvalidDeviceId,
    /// Device key must be non-empty.
    MissingDeviceKey,
    /// A string does not fit its fixed-capacity buffer.
    TooLong(&'static str),
    /// A timing parameter is zero or inconsistent with another.
    Timing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::InvalidServerUrl => write!(f, "server URL must use http:// or https://"),
            Self::InvalidDeviceId => write!(f, "device id must be non-empty and URL-safe"),
            Self::MissingDeviceKey => write!(f, "device key is empty"),
            Self::TooLong(field) => write!(f, "{field} exceeds its buffer"),
            Self::Timing(msg) => write!(f, "timing: {msg}"),
        }
    }
}

impl core::error::Error for ConfigError {}
