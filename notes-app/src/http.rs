//! Shared HTTP client and request deadline helper.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::RemoteError;

static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide connection pool. Holds no session state.
pub fn shared_client() -> &'static reqwest::Client {
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent(concat!("notes-app/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[HTTP] Falling back to default client: {}", e);
                reqwest::Client::new()
            })
    })
}

/// Run a remote call under a deadline.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, RemoteError>
where
    F: Future<Output = Result<T, RemoteError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(RemoteError::Timeout(limit)),
    }
}

/// Turn a non-2xx response into `RemoteError::Status`, keeping the body for the log.
pub async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}
