//! Transport abstraction: a blocking HTTP request/response channel.
//!
//! Concrete implementations:
//! - `EspHttpTransport` (ESP-IDF HTTP client, plain or TLS)
//! - [`NullTransport`] for builds and tests without a network
//!
//! The poll client is generic over `HttpTransport`, so swapping the HTTP
//! stack requires zero changes to the poll logic.

use crate::error::TransportError;

/// Status line and body length of a completed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Bytes written into the caller's body buffer.
    pub body_len: usize,
    /// The server sent more than the buffer could hold.
    pub truncated: bool,
}

/// Blocking request/response channel to the control server.
pub trait HttpTransport {
    /// POST `body` with `Content-Type: application/json` to `url`, reading
    /// at most `response.len()` bytes of the response body into `response`.
    fn post_json(
        &mut self,
        url: &str,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, TransportError>;
}

/// A transport with no network behind it: every request fails to connect.
pub struct NullTransport;

impl HttpTransport for NullTransport {
    fn post_json(
        &mut self,
        _url: &str,
        _body: &[u8],
        _response: &mut [u8],
    ) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Connect)
    }
}

/// Copy a streamed body into `buf`, flagging anything that did not fit.
///
/// `read` follows `std::io::Read` semantics: `Ok(0)` marks end of body.
pub fn read_bounded<E>(
    buf: &mut [u8],
    mut read: impl FnMut(&mut [u8]) -> Result<usize, E>,
) -> Result<(usize, bool), E> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = read(&mut buf[filled..])?;
        if n == 0 {
            return Ok((filled, false));
        }
        filled += n;
    }
    // Buffer full: probe once for trailing bytes.
    let mut probe = [0u8; 1];
    let extra = read(&mut probe)?;
    Ok((filled, extra > 0))
}
