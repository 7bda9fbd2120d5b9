//! Poll client: one request/response exchange with the control server.
//!
//! The client is stateless between polls: it holds only the prebuilt URL and
//! request body.  Cadence (when to poll) and the previous mode (for change
//! detection) live with the controller and the mode machine respectively.
//! There are no retries here; the next cadence slot is the retry.

use log::{debug, warn};

use crate::config::DeviceConfig;
use crate::error::{ConfigError, PollError};
use crate::fsm::ModeState;

use super::codec::{self, MAX_RESPONSE_SIZE};
use super::transport::HttpTransport;

/// Capacity of the full poll URL (base + `/devices/<id>/poll`).
pub const POLL_URL_CAPACITY: usize = 224;

pub struct PollClient {
    url: heapless::String<POLL_URL_CAPACITY>,
    request: Vec<u8>,
}

impl PollClient {
    /// Build the client for `<endpoint>/devices/<device_id>/poll`.
    pub fn new(config: &DeviceConfig) -> Result<Self, ConfigError> {
        let url = config.poll_url()?;
        let request =
            codec::encode_request(&config.device_key).ok_or(ConfigError::TooLong("poll request"))?;
        Ok(Self { url, request })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run one poll.  A failure never yields a partial state: the caller
    /// either gets a complete [`ModeState`] or an error.
    pub fn poll(&self, transport: &mut impl HttpTransport) -> Result<ModeState, PollError> {
        let mut body = [0u8; MAX_RESPONSE_SIZE];
        let response = transport.post_json(&self.url, &self.request, &mut body)?;

        if response.status != 200 {
            warn!("Poll: HTTP {} from {}", response.status, self.url);
            return Err(PollError::Rejected(response.status));
        }
        if response.truncated {
            warn!("Poll: response exceeds {} bytes", MAX_RESPONSE_SIZE);
            return Err(PollError::Malformed);
        }

        let len = response.body_len.min(body.len());
        codec::decode_response(&body[..len]).ok_or_else(|| {
            debug!("Poll: unparseable body ({} bytes)", len);
            PollError::Malformed
        })
    }
}
