//! Error taxonomy for the notes client.

use std::time::Duration;
use thiserror::Error;

/// Failure to resolve or refresh the signed-in session.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("session expired")]
    Expired,
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

/// Failure talking to a remote collaborator (note store or function endpoint).
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("task aborted: {0}")]
    Aborted(String),
}

/// Which remote write an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WriteOp {
    Create,
    Delete,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch notes: {0}")]
    RemoteRead(#[source] RemoteError),
    #[error("failed to {op} note: {source}")]
    RemoteWrite {
        op: WriteOp,
        #[source]
        source: RemoteError,
    },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("side call failed: {0}")]
    SideCall(#[source] RemoteError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl SyncError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SyncError::InvalidOperation(msg.into())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
