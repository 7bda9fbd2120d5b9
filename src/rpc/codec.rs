//! JSON wire codec for the poll exchange.
//!
//! Request:
//! ```text
//! {"deviceKey": "<shared secret>"}
//! ```
//!
//! Response (HTTP 200):
//! ```text
//! {"mode": "OFF" | "PULSE" | "CONTINUOUS",
//!  "pulseIntervalSeconds": <int>,
//!  "pulseOnMillis": <int>,
//!  "validUntil": <string | null>}
//! ```
//!
//! Both directions are bounded: the request must fit [`MAX_REQUEST_SIZE`]
//! and the response body is read into a [`MAX_RESPONSE_SIZE`] buffer.
//! Extra response fields are ignored; missing required fields, unknown modes
//! and non-integer timings are rejected.

use serde::{Deserialize, Serialize};

use crate::fsm::state::{Mode, ModeState, ValidUntil};

/// Maximum encoded request size.
pub const MAX_REQUEST_SIZE: usize = 200;

/// Maximum response body size (protects against memory exhaustion).
pub const MAX_RESPONSE_SIZE: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PollRequest<'a> {
    device_key: &'a str,
}

/// Encode the poll request body.  `None` if it would exceed
/// [`MAX_REQUEST_SIZE`].
pub fn encode_request(device_key: &str) -> Option<Vec<u8>> {
    let body = serde_json::to_vec(&PollRequest { device_key }).ok()?;
    (body.len() <= MAX_REQUEST_SIZE).then_some(body)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollResponse {
    mode: heapless::String<16>,
    pulse_interval_seconds: i64,
    pulse_on_millis: i64,
    #[serde(default)]
    valid_until: Option<ValidUntil>,
}

/// Decode a 200 response body into a complete [`ModeState`].
///
/// Negative timings clamp to zero (an interval of zero never fires);
/// values beyond `u32::MAX` saturate.
pub fn decode_response(body: &[u8]) -> Option<ModeState> {
    if body.len() > MAX_RESPONSE_SIZE {
        return None;
    }
    let wire: PollResponse = serde_json::from_slice(body).ok()?;
    Some(ModeState {
        mode: Mode::from_wire(&wire.mode)?,
        pulse_interval_secs: clamp_u32(wire.pulse_interval_seconds),
        pulse_on_ms: clamp_u32(wire.pulse_on_millis),
        valid_until: wire.valid_until,
    })
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}
