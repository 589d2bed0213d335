//! Startup call to the external function endpoint.
//!
//! Posts a fixed payload with the signed-in user's id token and logs whatever
//! comes back. It does not touch note data.

use notes_types::SideCallPayload;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthProvider;
use crate::error::{RemoteError, SyncError, SyncResult};
use crate::http;

pub struct SideCallClient {
    url: String,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
    client: reqwest::Client,
}

impl SideCallClient {
    pub fn new(url: &str, auth: Arc<dyn AuthProvider>, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            auth,
            timeout,
            client: http::shared_client().clone(),
        }
    }

    /// Resolve the user, post the payload, log and return the response body.
    pub async fn run(&self) -> SyncResult<serde_json::Value> {
        let user = self.auth.current_user().await.map_err(|e| {
            log::error!("[SIDE_CALL] No session for {}: {}", self.url, e);
            SyncError::SideCall(RemoteError::Auth(e))
        })?;
        log::info!("[SIDE_CALL] Posting to {} as {}", self.url, user.username);

        let body = http::with_timeout(self.timeout, self.post(&user.session.id_token))
            .await
            .map_err(|e| {
                log::error!("[SIDE_CALL] {} failed: {}", self.url, e);
                SyncError::SideCall(e)
            })?;

        log::info!("[SIDE_CALL] Response: {}", body);
        Ok(body)
    }

    async fn post(&self, id_token: &str) -> Result<serde_json::Value, RemoteError> {
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, id_token)
            .json(&SideCallPayload::default())
            .send()
            .await?;

        let text = http::ensure_success(resp).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        // The body is only logged; keep non-JSON replies verbatim.
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}
