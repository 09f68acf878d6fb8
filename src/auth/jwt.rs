use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload: the user's identity and nothing else. Password material is
/// never signed into a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: Option<String>,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Signing and verification material, one secret per token kind.
#[derive(Clone)]
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            access_secret,
            refresh_secret,
            issuer,
            audience,
            access_ttl_minutes,
            refresh_ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            issuer,
            audience,
            access_ttl: Duration::from_secs((access_ttl_minutes as u64) * 60),
            refresh_ttl: Duration::from_secs((refresh_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    fn sign_with_kind(
        &self,
        id: i64,
        name: Option<&str>,
        email: &str,
        kind: TokenKind,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let (ttl, key) = match kind {
            TokenKind::Access => (self.access_ttl, &self.access_encoding),
            TokenKind::Refresh => (self.refresh_ttl, &self.refresh_encoding),
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: id,
            name: name.map(str::to_string),
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, key)?;
        debug!(user_id = %id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, id: i64, name: Option<&str>, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(id, name, email, TokenKind::Access)
    }

    pub fn sign_refresh(&self, id: i64, name: Option<&str>, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(id, name, email, TokenKind::Refresh)
    }

    /// Verify a token of the given kind. Expiry is reported separately from
    /// every other failure so callers can prompt a re-login.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        // Belt and braces: the secrets already differ per kind.
        if data.claims.kind != kind {
            return Err(TokenError::Invalid);
        }
        debug!(user_id = %data.claims.sub, kind = ?kind, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::test())
    }

    #[tokio::test]
    async fn sign_and_verify_access_token() {
        let keys = make_keys();
        let token = keys
            .sign_access(7, Some("Jane"), "jane@example.com")
            .expect("sign access");
        let claims = keys.verify(&token, TokenKind::Access).expect("verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.name.as_deref(), Some("Jane"));
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn sign_and_verify_refresh_token() {
        let keys = make_keys();
        let token = keys
            .sign_refresh(7, None, "jane@example.com")
            .expect("sign refresh");
        let claims = keys.verify(&token, TokenKind::Refresh).expect("verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.name, None);
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[tokio::test]
    async fn access_token_is_not_a_refresh_token() {
        let keys = make_keys();
        let token = keys
            .sign_access(1, None, "a@b.co")
            .expect("sign access");
        let err = keys.verify(&token, TokenKind::Refresh).unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
    }

    #[tokio::test]
    async fn verify_rejects_forged_token() {
        let keys = make_keys();
        let token = keys.sign_access(1, None, "a@b.co").expect("sign access");
        // Flip a character in the signature segment.
        let mut forged = token.clone();
        let last = forged.pop().unwrap();
        forged.push(if last == 'A' { 'B' } else { 'A' });
        let err = keys.verify(&forged, TokenKind::Access).unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
    }

    #[tokio::test]
    async fn verify_reports_expiry_distinctly() {
        let keys = make_keys();
        // Hand-craft a token whose exp is well past the default leeway.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: 1,
            name: None,
            email: "a@b.co".into(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
            kind: TokenKind::Access,
        };
        let token = encode(&Header::default(), &claims, &keys.access_encoding).unwrap();
        let err = keys.verify(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[tokio::test]
    async fn round_trip_preserves_identity_claims() {
        let keys = make_keys();
        let token = keys
            .sign_access(42, Some("Sam"), "sam@shop.dev")
            .expect("sign");
        let claims = keys.verify(&token, TokenKind::Access).expect("verify");
        assert_eq!(
            (claims.sub, claims.name.as_deref(), claims.email.as_str()),
            (42, Some("Sam"), "sam@shop.dev")
        );
    }
}
