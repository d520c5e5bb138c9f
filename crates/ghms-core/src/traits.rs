//! Trait seams of the audit ledger.
//!
//! - `LedgerStore` — durable, append-only persistence of committed entries
//! - `AuditSink`   — downstream consumers of committed entries (SIEM feeds)
//!
//! `AuditLedger` owns one store and any number of sinks and is the only
//! component allowed to call `append_entry`.

use std::sync::Arc;

use ghms_contracts::{
    entry::{AuditEntry, PendingEntry},
    error::AuditResult,
};

/// Append-only persistence for ledger entries.
///
/// Implementations must offer read-after-write consistency: `last_entry()`
/// called right after a successful `append_entry()` returns the entry that
/// was just committed.
pub trait LedgerStore: Send + Sync {
    /// Commit `entry`, assigning the next `sequence_id`.
    ///
    /// Must fail with `AuditError::ChainConflict` when `entry.prev_hash` is
    /// not the `curr_hash` of the current tail (or `GENESIS_HASH` for an
    /// empty store), so a stale writer can never fork the chain.
    fn append_entry(&self, entry: PendingEntry) -> AuditResult<AuditEntry>;

    /// The most recently committed entry, if any.
    fn last_entry(&self) -> AuditResult<Option<AuditEntry>>;

    /// All entries with `start_id <= sequence_id <= end_id`, ascending.
    fn entries_in_range(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>>;

    /// The entry immediately preceding `sequence_id` in ledger order.
    fn entry_before(&self, sequence_id: u64) -> AuditResult<Option<AuditEntry>>;

    /// Number of committed entries.
    fn len(&self) -> AuditResult<u64>;

    fn is_empty(&self) -> AuditResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// A consumer that receives every committed entry, in ledger order.
///
/// Sink failures never undo an append.
pub trait AuditSink: Send + Sync {
    fn emit(&self, entry: &AuditEntry) -> AuditResult<()>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    fn append_entry(&self, entry: PendingEntry) -> AuditResult<AuditEntry> {
        (**self).append_entry(entry)
    }

    fn last_entry(&self) -> AuditResult<Option<AuditEntry>> {
        (**self).last_entry()
    }

    fn entries_in_range(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>> {
        (**self).entries_in_range(start_id, end_id)
    }

    fn entry_before(&self, sequence_id: u64) -> AuditResult<Option<AuditEntry>> {
        (**self).entry_before(sequence_id)
    }

    fn len(&self) -> AuditResult<u64> {
        (**self).len()
    }
}

impl<S: AuditSink + ?Sized> AuditSink for Arc<S> {
    fn emit(&self, entry: &AuditEntry) -> AuditResult<()> {
        (**self).emit(entry)
    }
}
