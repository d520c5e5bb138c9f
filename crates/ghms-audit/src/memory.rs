//! In-memory implementation of `LedgerStore`.
//!
//! `InMemoryLedgerStore` keeps committed entries in a `Vec` behind a
//! `Mutex`.  It is the reference store for tests and dry runs; nothing
//! survives the process.

use std::sync::Mutex;

use tracing::debug;

use ghms_contracts::{
    entry::{AuditEntry, PendingEntry, GENESIS_HASH},
    error::{AuditError, AuditResult},
};
use ghms_core::traits::LedgerStore;

/// The mutable interior of an `InMemoryLedgerStore`.
#[derive(Default)]
pub(crate) struct InMemoryState {
    /// Committed entries in sequence order.
    pub(crate) entries: Vec<AuditEntry>,
}

/// A process-local, append-only ledger store.
///
/// Sequence ids start at 1.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    pub(crate) state: Mutex<InMemoryState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuditResult<std::sync::MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("ledger state lock poisoned: {}", e),
        })
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append_entry(&self, entry: PendingEntry) -> AuditResult<AuditEntry> {
        let mut state = self.lock()?;

        let tail = state
            .entries
            .last()
            .map(|last| last.curr_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        if entry.prev_hash != tail {
            return Err(AuditError::ChainConflict {
                expected: entry.prev_hash,
                actual: tail,
            });
        }

        let sequence_id = state.entries.last().map_or(1, |last| last.sequence_id + 1);
        let committed = AuditEntry::from_pending(sequence_id, entry);
        state.entries.push(committed.clone());

        debug!(sequence_id, "entry committed to in-memory ledger");
        Ok(committed)
    }

    fn last_entry(&self) -> AuditResult<Option<AuditEntry>> {
        Ok(self.lock()?.entries.last().cloned())
    }

    fn entries_in_range(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>> {
        Ok(self
            .lock()?
            .entries
            .iter()
            .filter(|e| (start_id..=end_id).contains(&e.sequence_id))
            .cloned()
            .collect())
    }

    fn entry_before(&self, sequence_id: u64) -> AuditResult<Option<AuditEntry>> {
        Ok(self
            .lock()?
            .entries
            .iter()
            .rev()
            .find(|e| e.sequence_id < sequence_id)
            .cloned())
    }

    fn len(&self) -> AuditResult<u64> {
        Ok(self.lock()?.entries.len() as u64)
    }
}
