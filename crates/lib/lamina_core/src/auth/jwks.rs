//! Signing key sources.
//!
//! [`RemoteJwks`] fetches the provider's JWK set over HTTPS and caches it for
//! as long as the response's `Cache-Control: max-age` allows.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use super::AuthError;

/// Google's published ID token signing keys.
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Cache lifetime when the response carries no usable `max-age`.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Minimum spacing between refetches triggered by an unknown key id, and
/// between attempts after a failed fetch.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves a JWT `kid` to the key that verifies it.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError>;
}

/// Convert a JWK set into decoding keys indexed by key id.
///
/// Keys without a `kid` or of an unusable type are skipped.
fn index_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    let mut keys = HashMap::with_capacity(set.keys.len());
    for jwk in &set.keys {
        let Some(kid) = jwk.common.key_id.clone() else {
            debug!("skipping jwk without kid");
            continue;
        };
        match DecodingKey::from_jwk(jwk) {
            Ok(key) => {
                keys.insert(kid, key);
            }
            Err(e) => warn!(kid = %kid, error = %e, "skipping unusable jwk"),
        }
    }
    keys
}

// =============================================================================
// Static keys
// =============================================================================

/// A fixed key set, loaded once.
pub struct StaticKeys {
    keys: HashMap<String, DecodingKey>,
}

impl StaticKeys {
    pub fn from_jwk_set(set: &JwkSet) -> Self {
        Self {
            keys: index_keys(set),
        }
    }

    /// Parse a JWK set document.
    pub fn from_jwks_json(json: &str) -> Result<Self, AuthError> {
        let set: JwkSet = serde_json::from_str(json)
            .map_err(|e| AuthError::KeyFetch(format!("invalid jwks document: {e}")))?;
        Ok(Self::from_jwk_set(&set))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeySource for StaticKeys {
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }
}

// =============================================================================
// Remote keys
// =============================================================================

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
    max_age: Duration,
}

impl CachedKeys {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < self.max_age
    }
}

/// JWK set fetched over HTTP and cached per `Cache-Control`.
pub struct RemoteJwks {
    url: Url,
    client: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
    /// Serializes fetches so concurrent misses trigger one request. Holds the
    /// time of the last failed fetch.
    refresh: Mutex<Option<Instant>>,
}

impl RemoteJwks {
    pub fn new(url: Url) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::KeyFetch(format!("http client: {e}")))?;
        Ok(Self {
            url,
            client,
            cache: RwLock::new(None),
            refresh: Mutex::new(None),
        })
    }

    /// Key source for Google's ID token keys.
    pub fn google() -> Result<Self, AuthError> {
        let url = Url::parse(GOOGLE_JWKS_URL)
            .map_err(|e| AuthError::KeyFetch(format!("jwks url: {e}")))?;
        Self::new(url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|c| c.is_fresh(Instant::now()))
            .and_then(|c| c.keys.get(kid).cloned())
    }

    async fn fetch(&self) -> Result<CachedKeys, AuthError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let max_age = resp
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_MAX_AGE);

        let set: JwkSet = resp
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("invalid jwks document: {e}")))?;
        let keys = index_keys(&set);
        info!(url = %self.url, keys = keys.len(), max_age_secs = max_age.as_secs(), "fetched signing keys");

        Ok(CachedKeys {
            keys,
            fetched_at: Instant::now(),
            max_age,
        })
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        let mut last_failure = self.refresh.lock().await;
        let now = Instant::now();
        let backing_off =
            (*last_failure).is_some_and(|at| now.duration_since(at) < MIN_REFETCH_INTERVAL);

        // Another task may have refreshed while we waited.
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                let stale_key = cached.keys.get(kid);
                if cached.is_fresh(now) {
                    if let Some(key) = stale_key {
                        return Ok(key.clone());
                    }
                    if now.duration_since(cached.fetched_at) < MIN_REFETCH_INTERVAL {
                        return Err(AuthError::UnknownKey(kid.to_string()));
                    }
                }
                if backing_off && let Some(key) = stale_key {
                    return Ok(key.clone());
                }
            }
        }

        if backing_off {
            return Err(AuthError::KeyFetch("recent jwks fetch failed".into()));
        }

        match self.fetch().await {
            Ok(fresh) => {
                *last_failure = None;
                let key = fresh.keys.get(kid).cloned();
                *self.cache.write().await = Some(fresh);
                key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
            }
            Err(e) => {
                *last_failure = Some(Instant::now());
                let cache = self.cache.read().await;
                if let Some(key) = cache.as_ref().and_then(|c| c.keys.get(kid)) {
                    warn!(error = %e, "jwks refresh failed, serving stale keys");
                    return Ok(key.clone());
                }
                Err(e)
            }
        }
    }
}

/// Extract `max-age` from a `Cache-Control` header value.
///
/// `no-cache` and `no-store` yield a zero lifetime.
pub fn parse_max_age(header: &str) -> Option<Duration> {
    let mut max_age = None;
    for directive in header.split(',') {
        let directive = directive.trim();
        if directive.eq_ignore_ascii_case("no-cache") || directive.eq_ignore_ascii_case("no-store")
        {
            return Some(Duration::ZERO);
        }
        if let Some((name, value)) = directive.split_once('=')
            && name.trim().eq_ignore_ascii_case("max-age")
            && let Ok(secs) = value.trim().trim_matches('"').parse::<u64>()
        {
            max_age = Some(Duration::from_secs(secs));
        }
    }
    max_age
}
