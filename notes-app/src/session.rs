//! Signed-in application context: built once the sign-in gate is passed, torn
//! down by `sign_out`.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::auth::{AuthProvider, CognitoAuthProvider, StaticTokenProvider};
use crate::config::{AuthConfig, Config};
use crate::error::{AuthError, SyncResult};
use crate::graphql::{AppSyncNoteStore, GraphQlClient};
use crate::side_call::SideCallClient;
use crate::sync::{NoteSyncClient, RemoteNoteStore, SyncEvent};

pub struct AppSession {
    auth: Arc<dyn AuthProvider>,
    side_call: Arc<SideCallClient>,
    username: String,
    pub sync: NoteSyncClient,
}

impl AppSession {
    /// Sign in with the configured provider and connect to the note API.
    pub async fn start(config: &Config) -> SyncResult<(Self, mpsc::UnboundedReceiver<SyncEvent>)> {
        let auth = sign_in(config).await?;
        let graphql = GraphQlClient::new(&config.graphql_endpoint, auth.clone(), config.request_timeout);
        let store: Arc<dyn RemoteNoteStore> = Arc::new(AppSyncNoteStore::new(graphql));
        Self::with_store(config, auth, store).await
    }

    /// Build a session over an already signed-in provider and any note store.
    pub async fn with_store(
        config: &Config,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn RemoteNoteStore>,
    ) -> SyncResult<(Self, mpsc::UnboundedReceiver<SyncEvent>)> {
        let user = auth.current_user().await?;
        log::info!("[SESSION] Signed in as {} via {}", user.username, auth.name());

        let (sync, events) = NoteSyncClient::new(store, config.request_timeout);
        let side_call = Arc::new(SideCallClient::new(
            &config.side_call_url,
            auth.clone(),
            config.request_timeout,
        ));

        Ok((
            Self {
                auth,
                side_call,
                username: user.username,
                sync,
            },
            events,
        ))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Start the startup side call as its own task.
    pub fn spawn_side_call(&self) -> JoinHandle<SyncResult<serde_json::Value>> {
        let side_call = self.side_call.clone();
        tokio::spawn(async move { side_call.run().await })
    }

    /// Forget the session. Writes still in flight are left to finish on their own.
    pub async fn sign_out(self) {
        self.auth.sign_out().await;
        log::info!("[SESSION] {} signed out", self.username);
    }
}

async fn sign_in(config: &Config) -> Result<Arc<dyn AuthProvider>, AuthError> {
    match &config.auth {
        AuthConfig::StaticToken { id_token } => Ok(Arc::new(StaticTokenProvider::new(id_token)?)),
        AuthConfig::Cognito {
            endpoint,
            client_id,
            username,
            password,
        } => {
            let provider = CognitoAuthProvider::new(endpoint, client_id, username, password, config.request_timeout);
            provider.sign_in().await?;
            Ok(Arc::new(provider))
        }
    }
}
