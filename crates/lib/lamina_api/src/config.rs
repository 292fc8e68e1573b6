//! API server configuration.

use lamina_core::auth::jwks::GOOGLE_JWKS_URL;
use tracing::warn;

/// Origins allowed when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "https://lambda-learning.kstrm.com",
    "https://dx0z6fxaxyua0.cloudfront.net",
];

/// Configuration for the API server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000"). Unused on Lambda.
    pub bind_addr: String,
    /// Google OAuth client id; enables bearer auth when set.
    pub google_client_id: Option<String>,
    /// JWK set endpoint for token signing keys.
    pub jwks_url: String,
    /// CORS origins. `*` mirrors the request origin.
    pub allowed_origins: Vec<String>,
    /// Clock skew tolerated on token expiry, in seconds.
    pub clock_skew_secs: u64,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:8000`                          |
    /// | `GOOGLE_CLIENT_ID`     | unset (auth disabled)                     |
    /// | `GOOGLE_JWKS_URL`      | `https://www.googleapis.com/oauth2/v3/certs` |
    /// | `ALLOWED_ORIGINS`      | the two deployment origins                |
    /// | `AUTH_CLOCK_SKEW_SECS` | `0`                                       |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let allowed_origins = match non_empty("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let clock_skew_secs = match non_empty("AUTH_CLOCK_SKEW_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring invalid AUTH_CLOCK_SKEW_SECS");
                0
            }),
            None => 0,
        };

        Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".into()),
            google_client_id: non_empty("GOOGLE_CLIENT_ID").map(|v| v.trim().to_string()),
            jwks_url: non_empty("GOOGLE_JWKS_URL").unwrap_or_else(|| GOOGLE_JWKS_URL.into()),
            allowed_origins,
            clock_skew_secs,
        }
    }

    /// Whether requests to protected routes must carry a bearer token.
    pub fn auth_enabled(&self) -> bool {
        self.google_client_id.is_some()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
