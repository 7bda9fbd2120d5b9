//! ESP-IDF HTTP(S) transport.
//!
//! Implements [`HttpTransport`] on `EspHttpConnection`.  A fresh connection
//! is opened per poll and dropped afterwards, so a stale socket can never
//! survive a link drop.  `https://` URLs are verified against the ESP-IDF
//! certificate bundle unless [`TlsMode::Unverified`] is configured, in which
//! case no CA is attached and ESP-TLS skips server verification (this needs
//! `CONFIG_ESP_TLS_SKIP_SERVER_CERT_VERIFY`).
//!
//! Only compiled for `target_os = "espidf"` with the `espidf` feature; host
//! tests use mock transports.

use core::fmt::Write as _;
use core::time::Duration;

use embedded_svc::http::client::Client;
use embedded_svc::io::{Read as _, Write as _};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_svc::io::EspIOError;
use log::{debug, warn};

use crate::config::{DeviceConfig, TlsMode};
use crate::error::TransportError;
use crate::rpc::transport::{HttpResponse, HttpTransport, read_bounded};

/// `ESP_ERR_HTTP_EAGAIN` (`ESP_ERR_HTTP_BASE + 7`): read timed out.
const ESP_ERR_HTTP_EAGAIN: i32 = 0x7007;

pub struct EspHttpTransport {
    timeout: Duration,
    tls: TlsMode,
}

impl EspHttpTransport {
    pub fn new(config: &DeviceConfig) -> Self {
        if config.tls_mode() == TlsMode::Unverified {
            warn!("HTTP: server certificate verification disabled");
        }
        Self {
            timeout: Duration::from_millis(u64::from(config.http_timeout_ms)),
            tls: config.tls_mode(),
        }
    }

    fn connection_config(&self) -> Configuration {
        Configuration {
            timeout: Some(self.timeout),
            crt_bundle_attach: match self.tls {
                TlsMode::CertBundle => Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                TlsMode::Plain | TlsMode::Unverified => None,
            },
            skip_cert_common_name_check: self.tls == TlsMode::Unverified,
            ..Default::default()
        }
    }
}

fn classify(e: &EspIOError, fallback: TransportError) -> TransportError {
    let code = e.0.code();
    if code == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32 || code == ESP_ERR_HTTP_EAGAIN {
        TransportError::Timeout
    } else {
        fallback
    }
}

impl HttpTransport for EspHttpTransport {
    fn post_json(
        &mut self,
        url: &str,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, TransportError> {
        let connection = EspHttpConnection::new(&self.connection_config()).map_err(|e| {
            warn!("HTTP: connection setup failed: {}", e);
            TransportError::Connect
        })?;
        let mut client = Client::wrap(connection);

        let mut content_length = heapless::String::<10>::new();
        // Ten digits hold any usize body length on a 32-bit target.
        let _ = write!(content_length, "{}", body.len());
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
        ];

        let mut request = client.post(url, &headers).map_err(|e| {
            debug!("HTTP: open {} failed: {:?}", url, e);
            classify(&e, TransportError::Connect)
        })?;
        request.write_all(body).map_err(|e| {
            debug!("HTTP: write failed: {:?}", e);
            classify(&e, TransportError::Io)
        })?;
        request.flush().map_err(|e| classify(&e, TransportError::Io))?;

        let mut reply = request.submit().map_err(|e| {
            debug!("HTTP: submit failed: {:?}", e);
            classify(&e, TransportError::Connect)
        })?;
        let status = reply.status();

        let (body_len, truncated) = read_bounded(response, |chunk| reply.read(chunk))
            .map_err(|e| {
                debug!("HTTP: read failed: {:?}", e);
                classify(&e, TransportError::Io)
            })?;

        Ok(HttpResponse {
            status,
            body_len,
            truncated,
        })
    }
}
