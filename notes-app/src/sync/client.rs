//! NoteSyncClient: keeps the local note list close to the remote store.
//!
//! Writes are optimistic: the local list changes first, the remote call is then
//! spawned and not awaited. A failed remote write is reported on the event
//! channel and through its `PendingWrite`; the local change is never rolled back.
//! The store-assigned id of a created note only shows up after the next
//! `fetch_all`.

use notes_types::{CreateNoteInput, DeleteNoteInput, Note};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::op_lock::NoteLocks;
use super::pending::{CreateOutcome, PendingWrite, SyncEvent};
use super::store::RemoteNoteStore;
use crate::error::{RemoteError, SyncError, SyncResult, WriteOp};
use crate::form::FormDraft;
use crate::http::with_timeout;

pub struct NoteSyncClient {
    store: Arc<dyn RemoteNoteStore>,
    notes: Vec<Note>,
    draft: FormDraft,
    locks: Arc<NoteLocks>,
    timeout: Duration,
    next_seq: u64,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl NoteSyncClient {
    /// Create a client with an empty list. The receiver yields one event per
    /// finished remote write.
    pub fn new(store: Arc<dyn RemoteNoteStore>, timeout: Duration) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            store,
            notes: Vec::new(),
            draft: FormDraft::default(),
            locks: NoteLocks::new(),
            timeout,
            next_seq: 0,
            events: tx,
        };
        (client, rx)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    /// Sequence number the next operation will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq + 1
    }

    fn take_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Replace the local list with the store's current contents.
    ///
    /// On failure the local list is kept as it was and the error is returned.
    pub async fn fetch_all(&mut self) -> SyncResult<&[Note]> {
        let seq = self.take_seq();
        log::debug!("[SYNC] #{} fetch_all", seq);

        let result = with_timeout(self.timeout, self.store.list_notes()).await;
        match result {
            Ok(notes) => {
                log::info!(
                    "[SYNC] #{} fetched {} notes (replacing {} local)",
                    seq,
                    notes.len(),
                    self.notes.len()
                );
                self.notes = notes;
                Ok(&self.notes)
            }
            Err(e) => {
                log::error!("[SYNC] #{} fetch failed, keeping {} local notes: {}", seq, self.notes.len(), e);
                Err(SyncError::RemoteRead(e))
            }
        }
    }

    /// Submit the form draft.
    ///
    /// An incomplete draft is ignored. Otherwise the note is appended locally,
    /// the remote create is spawned, and the draft is cleared before the store
    /// answers.
    pub fn create(&mut self) -> CreateOutcome {
        let Some(note) = self.draft.to_note() else {
            log::debug!(
                "[SYNC] create ignored, '{}' is empty",
                self.draft.missing_field().map(|f| f.to_string()).unwrap_or_default()
            );
            return CreateOutcome::Skipped;
        };

        let seq = self.take_seq();
        let input = CreateNoteInput::from(&note);
        self.notes.push(note);

        let pending = self.spawn_write(seq, WriteOp::Create, None, move |store| async move {
            store.create_note(input).await.map(|created| created.id)
        });

        self.draft.clear();
        CreateOutcome::Submitted(pending)
    }

    /// Remove `note` locally and spawn the remote delete.
    ///
    /// Notes without a store id are rejected before anything changes.
    pub fn delete(&mut self, note: &Note) -> SyncResult<PendingWrite> {
        let id = note
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SyncError::invalid(format!(
                    "note '{}' has no id yet; refresh before deleting it",
                    note.name
                ))
            })?;

        let seq = self.take_seq();
        let before = self.notes.len();
        self.notes.retain(|n| n.id.as_deref() != Some(id.as_str()));
        if self.notes.len() == before {
            log::debug!("[SYNC] #{} note {} not in local list, deleting remotely only", seq, id);
        }

        let input = DeleteNoteInput { id: id.clone() };
        let pending = self.spawn_write(seq, WriteOp::Delete, Some(id.clone()), move |store| async move {
            store.delete_note(input).await.map(|()| Some(id))
        });

        Ok(pending)
    }

    fn spawn_write<F, Fut>(&self, seq: u64, op: WriteOp, lock_id: Option<String>, call: F) -> PendingWrite
    where
        F: FnOnce(Arc<dyn RemoteNoteStore>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Option<String>, RemoteError>> + Send + 'static,
    {
        let store = self.store.clone();
        let locks = self.locks.clone();
        let events = self.events.clone();
        let timeout = self.timeout;

        log::debug!("[SYNC] #{} {} submitted", seq, op);

        let handle = tokio::spawn(async move {
            let _guard = match lock_id {
                Some(ref id) => Some(locks.acquire(id).await),
                None => None,
            };

            match with_timeout(timeout, call(store)).await {
                Ok(id) => {
                    log::info!("[SYNC] #{} {} confirmed (id: {})", seq, op, id.as_deref().unwrap_or("-"));
                    let _ = events.send(SyncEvent::WriteConfirmed { seq, op, id: id.clone() });
                    Ok(id)
                }
                Err(e) => {
                    log::warn!("[SYNC] #{} {} failed, local list not rolled back: {}", seq, op, e);
                    let _ = events.send(SyncEvent::WriteFailed {
                        seq,
                        op,
                        message: e.to_string(),
                    });
                    Err(SyncError::RemoteWrite { op, source: e })
                }
            }
        });

        PendingWrite::new(seq, op, handle)
    }
}
