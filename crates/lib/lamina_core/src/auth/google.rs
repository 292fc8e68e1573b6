//! Google ID token verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use tracing::debug;

use super::{AuthError, KeySource};
use crate::models::auth::GoogleClaims;

/// Issuers Google uses for ID tokens.
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Verifies Google ID tokens minted for a single OAuth client id.
#[derive(Clone)]
pub struct GoogleTokenVerifier {
    client_id: String,
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl GoogleTokenVerifier {
    /// Create a verifier accepting tokens whose `aud` is `client_id`.
    pub fn new(client_id: impl Into<String>, keys: Arc<dyn KeySource>) -> Self {
        let client_id = client_id.into();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.set_audience(&[client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        Self {
            client_id,
            keys,
            validation,
        }
    }

    /// Tolerate clock drift of `secs` when checking `exp`.
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.validation.leeway = secs;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Verify signature and claims, returning the decoded claims.
    pub async fn verify(&self, token: &str) -> Result<GoogleClaims, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.keys.key_for(&kid).await?;
        let data = decode::<GoogleClaims>(token, &key, &self.validation)?;
        debug!(sub = %data.claims.sub, kid = %kid, "verified google id token");
        Ok(data.claims)
    }
}

impl std::fmt::Debug for GoogleTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTokenVerifier")
            .field("client_id", &self.client_id)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticKeys;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const PRIVATE_KEY: &str = include_str!("../../testdata/test_rsa_private.pem");
    const JWKS: &str = include_str!("../../testdata/test_jwks.json");
    const CLIENT_ID: &str = "client-123.apps.googleusercontent.com";

    fn verifier() -> GoogleTokenVerifier {
        let keys = StaticKeys::from_jwks_json(JWKS).expect("test jwks");
        GoogleTokenVerifier::new(CLIENT_ID, Arc::new(keys))
    }

    fn sign(kid: Option<&str>, claims: serde_json::Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_string);
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).expect("test key");
        encode(&header, &claims, &key).expect("sign")
    }

    fn claims(exp_offset: i64) -> serde_json::Value {
        let now = Utc::now().timestamp();
        json!({
            "sub": "1234567890",
            "iss": "https://accounts.google.com",
            "aud": CLIENT_ID,
            "iat": now,
            "exp": now + exp_offset,
            "email": "ada@example.com",
            "email_verified": true,
        })
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let token = sign(Some("test-key-1"), claims(300));
        let claims = verifier().verify(&token).await.expect("valid token");
        assert_eq!(claims.sub, "1234567890");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.email_verified, Some(true));
    }

    #[tokio::test]
    async fn accepts_bare_issuer() {
        let mut c = claims(300);
        c["iss"] = json!("accounts.google.com");
        let token = sign(Some("test-key-1"), c);
        assert!(verifier().verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let token = sign(Some("test-key-1"), claims(-300));
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Expired), "got {err:?}");
    }

    #[tokio::test]
    async fn leeway_admits_recently_expired_token() {
        let token = sign(Some("test-key-1"), claims(-30));
        assert!(verifier().with_leeway(120).verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let mut c = claims(300);
        c["aud"] = json!("someone-else.apps.googleusercontent.com");
        let token = sign(Some("test-key-1"), c);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAudience), "got {err:?}");
    }

    #[tokio::test]
    async fn rejects_foreign_issuer() {
        let mut c = claims(300);
        c["iss"] = json!("https://evil.example.com");
        let token = sign(Some("test-key-1"), c);
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidIssuer), "got {err:?}");
    }

    #[tokio::test]
    async fn rejects_missing_kid() {
        let token = sign(None, claims(300));
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingKeyId), "got {err:?}");
    }

    #[tokio::test]
    async fn rejects_unknown_kid() {
        let token = sign(Some("rotated-away"), claims(300));
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey(ref k) if k == "rotated-away"));
    }

    #[tokio::test]
    async fn rejects_hs256_token() {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("test-key-1".into());
        let token = encode(&header, &claims(300), &EncodingKey::from_secret(b"secret")).unwrap();
        let err = verifier().verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedAlgorithm(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn rejects_tampered_payload() {
        let token = sign(Some("test-key-1"), claims(300));
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = sign(Some("test-key-1"), {
            let mut c = claims(300);
            c["sub"] = json!("attacker");
            c
        });
        let forged_payload: &str = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");
        // Payload from one token with the signature of another.
        let err = verifier().verify(&tampered).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)), "got {err:?}");
    }

    #[test]
    fn debug_shows_client_id_and_leeway() {
        let dbg = format!("{:?}", verifier().with_leeway(45));
        assert!(dbg.contains(CLIENT_ID), "{dbg}");
        assert!(dbg.contains("leeway: 45"), "{dbg}");
        assert!(!dbg.contains("keys"), "{dbg}");
    }
}
