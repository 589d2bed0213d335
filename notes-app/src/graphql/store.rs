//! `RemoteNoteStore` backed by the GraphQL note API.

use async_trait::async_trait;
use notes_types::{CreateNoteInput, DeleteNoteInput, Note};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphQlClient;
use super::queries;
use crate::error::RemoteError;
use crate::sync::RemoteNoteStore;

pub struct AppSyncNoteStore {
    client: GraphQlClient,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesData {
    list_notes: NoteConnection,
}

#[derive(Debug, Deserialize)]
struct NoteConnection {
    /// Items the resolver could not read come back as `null`.
    #[serde(default)]
    items: Vec<Option<Note>>,
    #[serde(default, rename = "nextToken")]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteData {
    create_note: Option<Note>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteNoteData {
    #[allow(dead_code)]
    delete_note: Option<Note>,
}

impl AppSyncNoteStore {
    pub fn new(client: GraphQlClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteNoteStore for AppSyncNoteStore {
    async fn list_notes(&self) -> Result<Vec<Note>, RemoteError> {
        let data: ListNotesData = self
            .client
            .execute("ListNotes", queries::LIST_NOTES, json!({}))
            .await?;

        let total = data.list_notes.items.len();
        let notes: Vec<Note> = data.list_notes.items.into_iter().flatten().collect();
        if notes.len() != total {
            log::warn!("[GRAPHQL] ListNotes skipped {} null items", total - notes.len());
        }
        if data.list_notes.next_token.is_some() {
            log::warn!("[GRAPHQL] ListNotes returned a further page; only the first {} notes are shown", notes.len());
        }
        Ok(notes)
    }

    async fn create_note(&self, input: CreateNoteInput) -> Result<Note, RemoteError> {
        let data: CreateNoteData = self
            .client
            .execute("CreateNote", queries::CREATE_NOTE, json!({ "input": input }))
            .await?;

        data.create_note
            .ok_or_else(|| RemoteError::Decode("createNote returned null".to_string()))
    }

    async fn delete_note(&self, input: DeleteNoteInput) -> Result<(), RemoteError> {
        let _: DeleteNoteData = self
            .client
            .execute("DeleteNote", queries::DELETE_NOTE, json!({ "input": input }))
            .await?;
        Ok(())
    }
}
