//! Typed GraphQL-over-HTTP client that attaches the session token.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthProvider;
use crate::error::RemoteError;
use crate::http;

pub struct GraphQlClient {
    endpoint: String,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
    client: reqwest::Client,
}

// ── Wire types ──────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    operation_name: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlErrorEntry {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_type: Option<String>,
}

impl GraphQlErrorEntry {
    fn describe(&self) -> String {
        match &self.error_type {
            Some(kind) => format!("{} ({})", self.message, kind),
            None => self.message.clone(),
        }
    }
}

// ── Client impl ─────────────────────────────────────

impl GraphQlClient {
    pub fn new(endpoint: &str, auth: Arc<dyn AuthProvider>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            auth,
            timeout,
            client: http::shared_client().clone(),
        }
    }

    /// Run one operation and decode its `data`. Any entry in `errors` fails the call.
    pub async fn execute<V, T>(&self, operation_name: &str, query: &str, variables: V) -> Result<T, RemoteError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        http::with_timeout(self.timeout, self.send(operation_name, query, variables)).await
    }

    async fn send<V, T>(&self, operation_name: &str, query: &str, variables: V) -> Result<T, RemoteError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let session = self.auth.current_session().await?;

        log::debug!("[GRAPHQL] {} -> {}", operation_name, self.endpoint);

        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, session.id_token.as_str())
            .json(&GraphQlRequest {
                query,
                operation_name,
                variables,
            })
            .send()
            .await?;

        let body = http::ensure_success(resp).await?.text().await?;
        decode_response(operation_name, &body)
    }
}

fn decode_response<T: DeserializeOwned>(operation_name: &str, body: &str) -> Result<T, RemoteError> {
    let envelope: GraphQlResponse<T> = serde_json::from_str(body)
        .map_err(|e| RemoteError::Decode(format!("{} response: {}", operation_name, e)))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.iter().map(|e| e.describe()).collect();
        log::warn!("[GRAPHQL] {} returned errors: {}", operation_name, messages.join("; "));
        return Err(RemoteError::GraphQl(messages));
    }

    envelope
        .data
        .ok_or_else(|| RemoteError::Decode(format!("{} response has no data", operation_name)))
}
