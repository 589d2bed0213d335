//! The remote authoritative store, as seen by the sync client.

use async_trait::async_trait;
use notes_types::{CreateNoteInput, DeleteNoteInput, Note};

use crate::error::RemoteError;

#[async_trait]
pub trait RemoteNoteStore: Send + Sync {
    /// Every note, in the store's order.
    async fn list_notes(&self) -> Result<Vec<Note>, RemoteError>;

    /// Persist a note; the store assigns its id.
    async fn create_note(&self, input: CreateNoteInput) -> Result<Note, RemoteError>;

    async fn delete_note(&self, input: DeleteNoteInput) -> Result<(), RemoteError>;
}
