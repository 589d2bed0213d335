//! Client-side synchronization of the note list with the remote store.

pub mod client;
pub mod op_lock;
pub mod pending;
pub mod store;

pub use client::NoteSyncClient;
pub use pending::{CreateOutcome, PendingWrite, SyncEvent};
pub use store::RemoteNoteStore;
