//! Passthru proxy forwarder.
//!
//! # Responsibilities
//! - Issue exactly one outbound HTTP(S) GET per inbound call
//! - Propagate the remote status and a filtered header set
//! - Short-circuit remote redirects without reading the body
//!
//! # Design Decisions
//! - Scheme is validated before any network activity
//! - Certificate verification is disabled only when the destination host
//!   is localhost; this is a narrow, documented exception, not a general
//!   insecure mode
//! - The client never follows redirects itself; a remote 3xx with a
//!   Location header becomes a redirect outcome for the caller
//! - The body is buffered in full and surfaced once, which structurally
//!   rules out double completion
//! - No retries; transport failures and timeouts surface to the caller

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use url::Url;

use crate::error::{RouterError, RouterResult};

/// Result of one passthru request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassthruOutcome {
    /// The remote answered with a 3xx carrying a Location header. The
    /// response body was never read.
    Redirect { status: StatusCode, location: String },

    /// Complete remote response: status, the Content-Type header if the
    /// remote sent one, and the full text-decoded body. All other remote
    /// headers are dropped.
    Response {
        status: StatusCode,
        content_type: Option<String>,
        body: String,
    },
}

impl PassthruOutcome {
    /// The remote status code.
    pub fn status(&self) -> StatusCode {
        match self {
            PassthruOutcome::Redirect { status, .. } => *status,
            PassthruOutcome::Response { status, .. } => *status,
        }
    }
}

/// Relays GET requests to a remote origin with a bounded total timeout.
#[derive(Debug, Clone)]
pub struct PassthruForwarder {
    timeout: Duration,
}

impl PassthruForwarder {
    /// Create a forwarder with the given total request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create a forwarder with the timeout in whole seconds.
    pub fn from_secs(timeout_secs: u64) -> Self {
        Self::new(Duration::from_secs(timeout_secs))
    }

    /// Forward a GET request to `destination`.
    ///
    /// Fails with [`RouterError::UnsupportedProtocol`] for any scheme
    /// other than http/https, before any connection is attempted, and
    /// with [`RouterError::ForwardTransport`] on network failure or
    /// timeout.
    pub async fn forward(&self, destination: &str) -> RouterResult<PassthruOutcome> {
        let parsed = Url::parse(destination).map_err(|source| RouterError::InvalidDestination {
            url: destination.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(RouterError::UnsupportedProtocol(other.to_string())),
        }

        let localhost = matches!(parsed.host_str(), Some("localhost"));
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(self.timeout)
            .danger_accept_invalid_certs(localhost)
            .build()
            .map_err(RouterError::ForwardTransport)?;

        // Userinfo becomes a basic-auth credential; the request URL is
        // sent without it.
        let username = parsed.username().to_string();
        let password = parsed.password().map(str::to_string);
        let mut request_url = parsed.clone();
        let _ = request_url.set_username("");
        let _ = request_url.set_password(None);

        let mut request = client.get(request_url);
        if !username.is_empty() || password.is_some() {
            request = request.basic_auth(username, password);
        }

        let response = request
            .send()
            .await
            .map_err(RouterError::ForwardTransport)?;
        let status = response.status();

        if status.is_redirection() {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                return Ok(PassthruOutcome::Redirect {
                    status,
                    location: location.to_string(),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(RouterError::ForwardTransport)?;

        Ok(PassthruOutcome::Response {
            status,
            content_type,
            body,
        })
    }
}
