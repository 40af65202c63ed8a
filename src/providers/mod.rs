//! Provider descriptors — one static entry per credential we can verify.
//!
//! A provider is pure data: which variable holds the secret, where to send
//! the probe, and how the secret is attached. The probe routine in
//! `crate::probe` consumes these; adding a provider means adding an entry
//! to `registry::PROVIDERS`, never new control flow.

pub mod registry;

use reqwest::Url;

use crate::environment::Environment;
use crate::probe::ProbeError;

pub use registry::{get_provider, PROVIDERS};

// ── Endpoint ────────────────────────────────────────────────────────

/// Where a probe is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// A fixed, documented URL.
    Fixed(&'static str),
    /// A self-hosted service: base URL read from another variable, with a
    /// fixed path appended.
    SelfHosted {
        base_url_var: &'static str,
        path: &'static str,
    },
}

impl Endpoint {
    /// Resolve to an absolute URL. A self-hosted base that is unset or not
    /// an absolute URL is an `InvalidEndpoint` failure.
    pub fn resolve(&self, env: &Environment) -> Result<Url, ProbeError> {
        let raw = match self {
            Endpoint::Fixed(url) => url.to_string(),
            Endpoint::SelfHosted { base_url_var, path } => {
                let base = env.get(base_url_var).unwrap_or_default().trim();
                format!("{}{}", base.trim_end_matches('/'), path)
            }
        };
        Url::parse(&raw).map_err(|e| ProbeError::InvalidEndpoint(format!("{raw}: {e}")))
    }
}

// ── Auth ────────────────────────────────────────────────────────────

/// How the secret is attached to the probe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Raw secret as the value of the named header.
    Header(&'static str),
    /// `Authorization: Bearer <secret>`
    Bearer,
    /// `Authorization: Token <secret>`
    Token,
    /// HTTP basic auth, secret as user name, empty password.
    Basic,
    /// Secret as the named query parameter.
    QueryParam(&'static str),
}

// ── Provider Spec ───────────────────────────────────────────────────

/// Static description of one credential check.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    /// Environment variable holding the credential; also the report label.
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub auth: Auth,
    /// Extra headers sent with every probe (e.g. API version pins).
    pub headers: &'static [(&'static str, &'static str)],
    /// Extra query parameters, appended before any auth parameter.
    pub query: &'static [(&'static str, &'static str)],
    /// Status code that means "credential accepted".
    pub expected_status: u16,
}

impl ProviderSpec {
    /// Bearer-token GET against a fixed URL, expecting 200. Most providers
    /// look like this.
    pub const fn bearer(name: &'static str, url: &'static str) -> Self {
        Self {
            name,
            endpoint: Endpoint::Fixed(url),
            auth: Auth::Bearer,
            headers: &[],
            query: &[],
            expected_status: 200,
        }
    }

    /// Full probe URL, including fixed query parameters and, for
    /// query-param auth, the secret itself. Never log the result.
    pub fn probe_url(&self, secret: &str, env: &Environment) -> Result<Url, ProbeError> {
        let mut url = self.endpoint.resolve(env)?;
        let auth_param = match self.auth {
            Auth::QueryParam(param) => Some(param),
            _ => None,
        };
        if !self.query.is_empty() || auth_param.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query {
                pairs.append_pair(key, value);
            }
            if let Some(param) = auth_param {
                pairs.append_pair(param, secret);
            }
        }
        Ok(url)
    }
}
