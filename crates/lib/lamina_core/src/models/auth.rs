//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Claims carried by a Google-issued ID token.
///
/// Only `sub`, `iss`, `aud`, `exp` and `iat` are guaranteed; the profile
/// claims depend on the scopes the client requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleClaims {
    /// Stable Google account id.
    pub sub: String,
    pub iss: String,
    /// OAuth client id the token was minted for.
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Hosted domain (Workspace accounts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd: Option<String>,
    /// Authorized party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
}
