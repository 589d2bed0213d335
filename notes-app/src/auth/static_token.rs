//! Provider for a token issued out of band.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthProvider, SessionTokens, decode_claims};
use crate::error::AuthError;

pub struct StaticTokenProvider {
    tokens: RwLock<Option<SessionTokens>>,
}

impl StaticTokenProvider {
    /// Accept a pre-issued id token. Its `exp` claim bounds the session.
    pub fn new(id_token: &str) -> Result<Self, AuthError> {
        let claims = decode_claims(id_token)?;
        let expires_at = claims.exp.unwrap_or(i64::MAX);

        log::info!(
            "[AUTH] Using static token for {} (expires_at: {})",
            claims.username(),
            expires_at
        );

        Ok(Self {
            tokens: RwLock::new(Some(SessionTokens {
                id_token: id_token.to_string(),
                expires_at,
            })),
        })
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn current_session(&self) -> Result<SessionTokens, AuthError> {
        let guard = self.tokens.read().await;
        let tokens = guard.as_ref().ok_or(AuthError::NotSignedIn)?;
        if !tokens.is_valid_at(chrono::Utc::now().timestamp()) {
            return Err(AuthError::Expired);
        }
        Ok(tokens.clone())
    }

    async fn sign_out(&self) {
        *self.tokens.write().await = None;
        log::info!("[AUTH] Static token discarded");
    }

    fn name(&self) -> &'static str {
        "static-token"
    }
}
