//! Probe dispatcher — one authenticated GET per credential.
//!
//! The `Prober` trait is the seam between the check runner and the
//! network. `HttpProber` is the real implementation; it sends exactly one
//! request, never retries, and reports either the response status or a
//! classified transport failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::environment::Environment;
use crate::providers::{Auth, ProviderSpec};
use crate::redact;

/// Default bound on every probe request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a probe produced no HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    Connect,
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProbeError {
    /// Short category tag used as the report detail.
    pub fn tag(&self) -> &'static str {
        match self {
            ProbeError::Timeout => "error:timeout",
            ProbeError::Connect => "error:connect",
            ProbeError::InvalidEndpoint(_) => "error:invalid_endpoint",
            ProbeError::Transport(_) => "error:transport",
        }
    }
}

// reqwest's message embeds the request URL, which carries the secret for
// query-param auth. Only the URL-free text is kept.
impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_connect() {
            ProbeError::Connect
        } else if e.is_builder() {
            ProbeError::InvalidEndpoint(e.to_string())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}

/// Sends one probe for a credential and returns the HTTP status.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        spec: &ProviderSpec,
        secret: &str,
        env: &Environment,
    ) -> Result<u16, ProbeError>;
}

/// reqwest-backed prober.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("keyprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(
        &self,
        spec: &ProviderSpec,
        secret: &str,
        env: &Environment,
    ) -> Result<u16, ProbeError> {
        let url = spec.probe_url(secret, env)?;

        debug!(
            provider = spec.name,
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            key = %redact::mask(secret),
            "Sending probe"
        );

        let mut req = self.client.get(url);
        for (header, value) in spec.headers {
            req = req.header(*header, *value);
        }
        req = match spec.auth {
            Auth::Header(header) => req.header(header, secret),
            Auth::Bearer => req.bearer_auth(secret),
            Auth::Token => req.header(AUTHORIZATION, format!("Token {}", secret)),
            Auth::Basic => req.basic_auth(secret, Some("")),
            Auth::QueryParam(_) => req,
        };

        let start = Instant::now();
        let resp = req.send().await?;
        let status = resp.status().as_u16();

        debug!(
            provider = spec.name,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Probe answered"
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{get_provider, Endpoint};

    #[test]
    fn test_tags_are_distinct() {
        let tags = [
            ProbeError::Timeout.tag(),
            ProbeError::Connect.tag(),
            ProbeError::InvalidEndpoint(String::new()).tag(),
            ProbeError::Transport(String::new()).tag(),
        ];
        for (i, a) in tags.iter().enumerate() {
            assert!(a.starts_with("error:"));
            for b in &tags[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn test_transport_error_keeps_query_key_out_of_message() {
        // Accepts and immediately hangs up, so the request fails mid-flight.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let spec = ProviderSpec {
            endpoint: Endpoint::SelfHosted { base_url_var: "GEMINI_BASE", path: "/v1beta/models" },
            ..*get_provider("GEMINI_API_KEY").unwrap()
        };
        let env: Environment = [("GEMINI_BASE", base.as_str())].into_iter().collect();
        let secret = "AIzaSyTOPSECRET123";

        let err = HttpProber::new(DEFAULT_TIMEOUT)
            .unwrap()
            .probe(&spec, secret, &env)
            .await
            .unwrap_err();

        assert_ne!(err, ProbeError::Timeout);
        assert!(!err.to_string().contains(secret));
        assert!(!format!("{:?}", err).contains(secret));
    }
}
