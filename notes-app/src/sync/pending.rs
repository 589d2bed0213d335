//! Handles and notifications for remote writes that run after the optimistic
//! local update has already been applied.

use tokio::task::JoinHandle;

use crate::error::{RemoteError, SyncError, SyncResult, WriteOp};

/// Outcome of a remote write, delivered on the client's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    WriteConfirmed {
        seq: u64,
        op: WriteOp,
        /// Store id of the note the write touched.
        id: Option<String>,
    },
    /// The local list already reflects the write; nothing was rolled back.
    WriteFailed {
        seq: u64,
        op: WriteOp,
        message: String,
    },
}

impl SyncEvent {
    pub fn seq(&self) -> u64 {
        match self {
            SyncEvent::WriteConfirmed { seq, .. } | SyncEvent::WriteFailed { seq, .. } => *seq,
        }
    }
}

/// A remote write in flight. Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    seq: u64,
    op: WriteOp,
    handle: JoinHandle<SyncResult<Option<String>>>,
}

impl PendingWrite {
    pub(crate) fn new(seq: u64, op: WriteOp, handle: JoinHandle<SyncResult<Option<String>>>) -> Self {
        Self { seq, op, handle }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn op(&self) -> WriteOp {
        self.op
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the store's answer. Returns the note id the store reported.
    pub async fn wait(self) -> SyncResult<Option<String>> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::RemoteWrite {
                op: self.op,
                source: RemoteError::Aborted(e.to_string()),
            }),
        }
    }
}

/// Result of a create request from the form.
#[derive(Debug)]
pub enum CreateOutcome {
    /// The draft was incomplete; nothing changed.
    Skipped,
    Submitted(PendingWrite),
}

impl CreateOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, CreateOutcome::Submitted(_))
    }

    pub fn into_pending(self) -> Option<PendingWrite> {
        match self {
            CreateOutcome::Submitted(pending) => Some(pending),
            CreateOutcome::Skipped => None,
        }
    }
}
