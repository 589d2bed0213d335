//! Cognito user pool sign-in: caches the token set from one USER_PASSWORD_AUTH
//! handshake and refreshes it with REFRESH_TOKEN_AUTH shortly before expiry.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{AuthProvider, SessionTokens};
use crate::error::AuthError;

/// How many seconds before expiry to proactively refresh.
const REFRESH_MARGIN_SECS: i64 = 60;

const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Debug, Clone)]
struct SessionState {
    id_token: String,
    refresh_token: String,
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    expires_in: i64,
    /// Absent on refresh responses.
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CognitoErrorBody {
    #[serde(default, rename = "__type")]
    error_type: String,
    #[serde(default)]
    message: String,
}

pub struct CognitoAuthProvider {
    endpoint: String,
    client_id: String,
    username: String,
    password: String,
    timeout: Duration,
    state: RwLock<Option<SessionState>>,
}

impl CognitoAuthProvider {
    pub fn new(endpoint: &str, client_id: &str, username: &str, password: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client_id: client_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            timeout,
            state: RwLock::new(None),
        }
    }

    /// Pass the sign-in gate. Replaces any cached session.
    pub async fn sign_in(&self) -> Result<SessionTokens, AuthError> {
        log::info!("[AUTH] Signing in {} at {}", self.username, self.endpoint);

        let result = self
            .initiate_auth(json!({
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": self.client_id,
                "AuthParameters": {
                    "USERNAME": self.username,
                    "PASSWORD": self.password,
                }
            }))
            .await?;

        let refresh_token = result
            .refresh_token
            .ok_or_else(|| AuthError::Rejected("sign-in response carried no refresh token".to_string()))?;
        let new_state = SessionState {
            id_token: result.id_token,
            refresh_token,
            expires_at: chrono::Utc::now().timestamp() + result.expires_in,
        };

        log::info!(
            "[AUTH] Signed in {} (expires_at: {})",
            self.username,
            new_state.expires_at
        );

        let tokens = to_tokens(&new_state);
        *self.state.write().await = Some(new_state);
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionState, AuthError> {
        log::info!("[AUTH] Refreshing session for {}", self.username);

        let result = self
            .initiate_auth(json!({
                "AuthFlow": "REFRESH_TOKEN_AUTH",
                "ClientId": self.client_id,
                "AuthParameters": {
                    "REFRESH_TOKEN": refresh_token,
                }
            }))
            .await?;

        Ok(SessionState {
            id_token: result.id_token,
            refresh_token: result
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
            expires_at: chrono::Utc::now().timestamp() + result.expires_in,
        })
    }

    async fn initiate_auth(&self, body: serde_json::Value) -> Result<AuthenticationResult, AuthError> {
        let resp = crate::http::shared_client()
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", INITIATE_AUTH_TARGET)
            .body(body.to_string())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .map_err(|e| AuthError::Transport(format!("Failed to read auth response: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &body_text));
        }

        parse_auth_response(&body_text)
    }
}

fn to_tokens(state: &SessionState) -> SessionTokens {
    SessionTokens {
        id_token: state.id_token.clone(),
        expires_at: state.expires_at,
    }
}

fn is_fresh(state: &SessionState, now: i64) -> bool {
    now < state.expires_at - REFRESH_MARGIN_SECS
}

fn parse_auth_response(body: &str) -> Result<AuthenticationResult, AuthError> {
    let parsed: InitiateAuthResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::Rejected(format!("Invalid auth response JSON: {}", e)))?;

    if let Some(challenge) = parsed.challenge_name {
        return Err(AuthError::Rejected(format!("unsupported challenge {}", challenge)));
    }

    parsed
        .authentication_result
        .ok_or_else(|| AuthError::Rejected("Missing AuthenticationResult in response".to_string()))
}

fn parse_error_body(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<CognitoErrorBody>(body) {
        Ok(err) if !err.error_type.is_empty() => {
            // "__type" may carry a namespace prefix: "com.amazon...#NotAuthorizedException"
            let kind = err.error_type.rsplit('#').next().unwrap_or(&err.error_type);
            AuthError::Rejected(format!("{}: {}", kind, err.message))
        }
        _ => AuthError::Rejected(format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl AuthProvider for CognitoAuthProvider {
    async fn current_session(&self) -> Result<SessionTokens, AuthError> {
        // Fast path: read lock
        {
            let state = self.state.read().await;
            match *state {
                Some(ref s) if is_fresh(s, chrono::Utc::now().timestamp()) => {
                    return Ok(to_tokens(s));
                }
                Some(_) => {}
                None => return Err(AuthError::NotSignedIn),
            }
        }

        // Slow path: write lock, double-check, then refresh
        let mut state = self.state.write().await;
        let refresh_token = match *state {
            Some(ref s) if is_fresh(s, chrono::Utc::now().timestamp()) => return Ok(to_tokens(s)),
            Some(ref s) => s.refresh_token.clone(),
            None => return Err(AuthError::NotSignedIn),
        };

        match self.refresh(&refresh_token).await {
            Ok(new_state) => {
                let tokens = to_tokens(&new_state);
                *state = Some(new_state);
                Ok(tokens)
            }
            // Keep the refresh token; a later call may reach the provider.
            Err(e @ AuthError::Transport(_)) => Err(e),
            Err(e) => {
                log::warn!("[AUTH] Refresh rejected, session dropped: {}", e);
                *state = None;
                Err(e)
            }
        }
    }

    async fn sign_out(&self) {
        *self.state.write().await = None;
        log::info!("[AUTH] Signed out {}", self.username);
    }

    fn name(&self) -> &'static str {
        "cognito"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response_success() {
        let result = parse_auth_response(
            r#"{"AuthenticationResult":{"AccessToken":"a","ExpiresIn":3600,"IdToken":"i","RefreshToken":"r","TokenType":"Bearer"},"ChallengeParameters":{}}"#,
        )
        .unwrap();

        assert_eq!(result.id_token, "i");
        assert_eq!(result.expires_in, 3600);
        assert_eq!(result.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn test_parse_auth_response_challenge() {
        let err = parse_auth_response(r#"{"ChallengeName":"NEW_PASSWORD_REQUIRED","Session":"s"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("NEW_PASSWORD_REQUIRED"));
    }

    #[test]
    fn test_parse_error_body_strips_namespace() {
        let err = parse_error_body(
            400,
            r#"{"__type":"com.amazonaws#NotAuthorizedException","message":"Incorrect username or password."}"#,
        );
        assert_eq!(
            err.to_string(),
            "identity provider rejected the request: NotAuthorizedException: Incorrect username or password."
        );
    }

    #[test]
    fn test_parse_error_body_falls_back_to_status() {
        let err = parse_error_body(502, "bad gateway");
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_refresh_margin() {
        let state = SessionState {
            id_token: "i".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 1_000,
        };
        assert!(is_fresh(&state, 1_000 - REFRESH_MARGIN_SECS - 1));
        assert!(!is_fresh(&state, 1_000 - REFRESH_MARGIN_SECS));
    }

    #[tokio::test]
    async fn test_not_signed_in_before_gate() {
        let provider = CognitoAuthProvider::new(
            "http://127.0.0.1:9/",
            "client",
            "alice",
            "secret",
            Duration::from_secs(1),
        );
        assert!(matches!(provider.current_session().await, Err(AuthError::NotSignedIn)));
    }
}
