//! Per-note operation locks.
//!
//! Remote writes that target the same note id run one at a time, in the order
//! they asked for the lock. Writes on different notes do not wait on each other.
//! Entries are dropped from the map once the last holder or waiter is gone.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

#[derive(Default)]
pub struct NoteLocks {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Held for the duration of one remote write on `id`.
pub struct NoteLockGuard {
    locks: Arc<NoteLocks>,
    id: String,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl NoteLocks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn acquire(self: &Arc<Self>, id: &str) -> NoteLockGuard {
        let slot = {
            let mut slots = self.slots.lock();
            slots
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = slot.clone().lock_owned().await;

        NoteLockGuard {
            locks: self.clone(),
            id: id.to_string(),
            slot,
            guard: Some(guard),
        }
    }

    /// Number of note ids with a holder or waiter.
    pub fn active(&self) -> usize {
        self.slots.lock().len()
    }
}

impl Drop for NoteLockGuard {
    fn drop(&mut self) {
        let mut slots = self.locks.slots.lock();
        self.guard.take();
        // Map entry + our `slot` clone; anything above that is a waiter.
        if Arc::strong_count(&self.slot) <= 2 {
            slots.remove(&self.id);
        }
    }
}
