//! HTTPS transport for DNS queries: DNS-over-HTTPS (RFC 8484)
//!
//! Sends DNS queries as HTTP POST requests with `application/dns-message` content type.
//! The request body is the raw DNS wire format message, and the response body
//! contains the raw DNS wire format response.
//!
//! Wire format (HTTP):
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```
//!
//! Only a 2xx status is taken to carry a reply (RFC 8484 §4.2.1), whatever DNS
//! response code is inside it. Response bodies are capped at
//! [`MAX_DNS_MESSAGE_SIZE`] bytes.

use super::tls;
use super::UpstreamClient;
use async_trait::async_trait;
use ferrous_doh_domain::{ConfigError, DohError, TlsOptions};
use hickory_proto::op::Message;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

/// Typical Ethernet MTU (1500) minus the IPv4 (20) and UDP (8) headers.
pub const MAX_DNS_MESSAGE_SIZE: usize = 1472;

/// Content type for DNS-over-HTTPS requests and responses (RFC 8484 §6)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Build the HTTP client shared by every endpoint of a pool.
///
/// Connections are pooled per host; HTTP/2 is negotiated through ALPN. The
/// client sets no request timeout: each exchange is bounded by the caller.
pub fn build_http_client(tls_options: Option<&TlsOptions>) -> Result<reqwest::Client, ConfigError> {
    let builder = reqwest::Client::builder()
        .pool_max_idle_per_host(4)
        .redirect(reqwest::redirect::Policy::none());

    let builder = match tls_options {
        Some(options) => builder.use_preconfigured_tls(tls::client_config(options)?),
        None => builder.use_rustls_tls(),
    };

    builder
        .build()
        .map_err(|e| ConfigError::Tls(format!("Failed to build HTTP client: {}", e)))
}

/// DNS-over-HTTPS transport (RFC 8484)
pub struct HttpsTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpsTransport {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn network_error(&self, e: reqwest::Error) -> DohError {
        DohError::Network {
            endpoint: self.url.clone(),
            reason: e.to_string(),
        }
    }

    /// Read at most one byte past the cap so an oversized body is detected
    /// without buffering it.
    async fn read_capped_body(&self, response: &mut reqwest::Response) -> Result<Vec<u8>, DohError> {
        let mut body = Vec::with_capacity(512);

        while let Some(chunk) = response.chunk().await.map_err(|e| self.network_error(e))? {
            let remaining = MAX_DNS_MESSAGE_SIZE + 1 - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);

            if body.len() > MAX_DNS_MESSAGE_SIZE {
                return Err(DohError::SizeLimit {
                    endpoint: self.url.clone(),
                    limit: MAX_DNS_MESSAGE_SIZE,
                });
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl UpstreamClient for HttpsTransport {
    async fn query(&self, request: &[u8]) -> Result<Message, DohError> {
        debug!(
            url = %self.url,
            message_len = request.len(),
            "Sending DoH query"
        );

        // POST with application/dns-message (RFC 8484 §4.1)
        let http_request = self
            .client
            .post(self.url.as_str())
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .body(request.to_vec())
            .build()
            .map_err(|e| DohError::RequestConstruction {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            })?;

        let mut response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %self.url, status = status.as_u16(), "DoH server rejected query");
            return Err(DohError::Protocol {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = self.read_capped_body(&mut response).await?;

        debug!(
            url = %self.url,
            response_len = body.len(),
            "DoH response received"
        );

        Message::from_vec(&body).map_err(|e| DohError::Decode {
            endpoint: self.url.clone(),
            reason: e.to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
