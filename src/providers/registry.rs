//! Provider registry — every credential the probe knows how to verify.
//!
//! Order here is report order. Each endpoint is a cheap authenticated
//! read (model list, account info, or a one-result search) so a probe
//! never creates, bills, or mutates anything.

use super::{Auth, Endpoint, ProviderSpec};

/// Pinned Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Variable holding the base URL of the self-hosted n8n instance.
pub const N8N_BASE_URL_VAR: &str = "N8N_BASE_URL";

pub static PROVIDERS: &[ProviderSpec] = &[
    // ── LLM providers ──
    ProviderSpec {
        name: "ANTHROPIC_API_KEY",
        endpoint: Endpoint::Fixed("https://api.anthropic.com/v1/models"),
        auth: Auth::Header("x-api-key"),
        headers: &[("anthropic-version", ANTHROPIC_VERSION)],
        query: &[],
        expected_status: 200,
    },
    ProviderSpec::bearer("OPENAI_API_KEY", "https://api.openai.com/v1/models"),
    ProviderSpec::bearer("OPENROUTER_API_KEY", "https://openrouter.ai/api/v1/models"),
    ProviderSpec::bearer("GROQ_API_KEY", "https://api.groq.com/openai/v1/models"),
    ProviderSpec {
        name: "GEMINI_API_KEY",
        endpoint: Endpoint::Fixed("https://generativelanguage.googleapis.com/v1beta/models"),
        auth: Auth::QueryParam("key"),
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    // ── Media ──
    ProviderSpec {
        name: "ELEVENLABS_API_KEY",
        endpoint: Endpoint::Fixed("https://api.elevenlabs.io/v1/voices"),
        auth: Auth::Header("xi-api-key"),
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    ProviderSpec {
        name: "HEYGEN_API_KEY",
        endpoint: Endpoint::Fixed("https://api.heygen.com/v2/avatars"),
        auth: Auth::Header("X-Api-Key"),
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    ProviderSpec {
        name: "REPLICATE_API_KEY",
        endpoint: Endpoint::Fixed("https://api.replicate.com/v1/models"),
        auth: Auth::Token,
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    // ── Social ──
    ProviderSpec::bearer("TWITTER_BEARER_TOKEN", "https://api.twitter.com/2/users/me"),
    ProviderSpec {
        name: "YOUTUBE_API_KEY",
        endpoint: Endpoint::Fixed("https://youtube.googleapis.com/youtube/v3/search"),
        auth: Auth::QueryParam("key"),
        headers: &[],
        query: &[("part", "snippet"), ("q", "ai automation"), ("maxResults", "1")],
        expected_status: 200,
    },
    // ── Automation, billing, publishing, hosting ──
    ProviderSpec {
        name: "N8N_API_KEY",
        endpoint: Endpoint::SelfHosted {
            base_url_var: N8N_BASE_URL_VAR,
            path: "/api/v1/workflows",
        },
        auth: Auth::Header("X-N8N-API-KEY"),
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    ProviderSpec {
        name: "STRIPE_SECRET_KEY",
        endpoint: Endpoint::Fixed("https://api.stripe.com/v1/balance"),
        auth: Auth::Basic,
        headers: &[],
        query: &[],
        expected_status: 200,
    },
    ProviderSpec::bearer("BEEHIIV_API_KEY", "https://api.beehiiv.com/v2/publications"),
    ProviderSpec::bearer("VERCEL_TOKEN", "https://api.vercel.com/v9/projects"),
];

/// Look up a provider by its credential variable name.
pub fn get_provider(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|p| p.name == name)
}
