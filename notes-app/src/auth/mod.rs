//! Session providers: resolve the signed-in user's token for remote calls.
//!
//! The sign-in gate is passed once at startup; afterwards every remote call asks
//! the provider for the current token, which may refresh it transparently.

pub mod cognito;
pub mod static_token;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::AuthError;

pub use cognito::CognitoAuthProvider;
pub use static_token::StaticTokenProvider;

/// Tokens of the current session.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// JWT presented to the note store and the function endpoint.
    pub id_token: String,
    /// Unix timestamp (seconds) after which the id token is rejected.
    pub expires_at: i64,
}

impl SessionTokens {
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// The signed-in user together with their session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub session: SessionTokens,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current session, refreshed if needed.
    async fn current_session(&self) -> Result<SessionTokens, AuthError>;

    /// Signed-in user. Default implementation reads the id token's claims.
    async fn current_user(&self) -> Result<AuthUser, AuthError> {
        let session = self.current_session().await?;
        let claims = decode_claims(&session.id_token)?;
        Ok(AuthUser {
            username: claims.username(),
            session,
        })
    }

    /// Forget the session locally.
    async fn sign_out(&self);

    /// Provider name for logs
    fn name(&self) -> &'static str;
}

/// The subset of id-token claims the client reads.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    pub sub: String,
    #[serde(default, rename = "cognito:username")]
    pub cognito_username: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl IdTokenClaims {
    pub fn username(&self) -> String {
        self.cognito_username
            .clone()
            .unwrap_or_else(|| self.sub.clone())
    }
}

/// Decode a JWT payload without verifying its signature. The store verifies it.
pub fn decode_claims(token: &str) -> Result<IdTokenClaims, AuthError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AuthError::MalformedToken("expected three JWT segments".to_string())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not JSON claims: {}", e)))
}
