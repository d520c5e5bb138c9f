//! The audit ledger: the serialized append path and range verification.
//!
//! Every append runs under one mutex:
//!
//!   lock → read tail hash → stamp + hash → store.append_entry → sinks
//!
//! The store re-checks `prev_hash` against its own tail, so two ledgers that
//! share a store without sharing a lock still cannot fork the chain: the
//! loser gets `ChainConflict` and retries on the fresh tail.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use ghms_contracts::{
    entry::{AuditEntry, PendingEntry, GENESIS_HASH},
    error::{AuditError, AuditResult},
    request::LogRequest,
    verify::VerificationReport,
};

use crate::{
    chain::{compute_hash, entry_timestamp, verify_entries},
    traits::{AuditSink, LedgerStore},
};

/// Default number of times an append is retried after a `ChainConflict`.
pub const DEFAULT_APPEND_RETRIES: u32 = 3;

/// Hash-chained, append-only audit ledger over a `LedgerStore`.
pub struct AuditLedger {
    store: Box<dyn LedgerStore>,
    sinks: Vec<Box<dyn AuditSink>>,
    append_lock: Mutex<()>,
    max_append_retries: u32,
}

impl AuditLedger {
    pub fn new(store: Box<dyn LedgerStore>) -> Self {
        Self {
            store,
            sinks: Vec::new(),
            append_lock: Mutex::new(()),
            max_append_retries: DEFAULT_APPEND_RETRIES,
        }
    }

    /// Forward every committed entry to `sink` as well.
    pub fn with_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_max_append_retries(mut self, retries: u32) -> Self {
        self.max_append_retries = retries;
        self
    }

    /// Append one event to the chain and return the committed entry.
    ///
    /// The timestamp is taken by the ledger, not the caller.  Errors from
    /// the store propagate; sink errors are logged and otherwise ignored.
    pub fn append(&self, request: LogRequest) -> AuditResult<AuditEntry> {
        request.validate()?;

        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| AuditError::StoreUnavailable {
                reason: format!("append lock poisoned: {}", e),
            })?;

        let fields = request.into_fields(entry_timestamp());
        let mut attempt = 0;

        let entry = loop {
            let prev_hash = self
                .store
                .last_entry()?
                .map(|last| last.curr_hash)
                .unwrap_or_else(|| GENESIS_HASH.to_string());
            let curr_hash = compute_hash(&prev_hash, &fields)?;

            let pending = PendingEntry {
                fields: fields.clone(),
                prev_hash,
                curr_hash,
            };

            match self.store.append_entry(pending) {
                Ok(entry) => break entry,
                Err(AuditError::ChainConflict { expected, actual })
                    if attempt < self.max_append_retries =>
                {
                    attempt += 1;
                    warn!(
                        action = %fields.action,
                        attempt,
                        expected = %expected,
                        actual = %actual,
                        "append raced another writer; retrying on new tail"
                    );
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            sequence_id = entry.sequence_id,
            action = %entry.fields.action,
            curr_hash = %entry.curr_hash,
            "audit entry appended"
        );

        for sink in &self.sinks {
            if let Err(e) = sink.emit(&entry) {
                warn!(
                    sequence_id = entry.sequence_id,
                    error = %e,
                    "audit sink rejected entry"
                );
            }
        }

        Ok(entry)
    }

    /// Verify the whole ledger from the genesis sentinel.
    ///
    /// An empty ledger is intact with `count = 0`.
    pub fn verify_all(&self) -> AuditResult<VerificationReport> {
        let Some(last) = self.store.last_entry()? else {
            return Ok(VerificationReport::intact(0));
        };
        let entries = self.store.entries_in_range(0, last.sequence_id)?;
        let report = verify_entries(&entries, GENESIS_HASH)?;
        log_report(&report, 0, last.sequence_id);
        Ok(report)
    }

    /// Verify the entries with `start_id <= sequence_id <= end_id`.
    ///
    /// `anchor` is the hash the first entry in the window must link to.
    /// When `None`, it is the stored `curr_hash` of the entry just before the
    /// window, or the genesis sentinel if the window starts the ledger.
    ///
    /// A malformed or empty window is `AuditError::NoEntriesInRange`, never
    /// a chain break.
    pub fn verify_range(
        &self,
        start_id: u64,
        end_id: u64,
        anchor: Option<&str>,
    ) -> AuditResult<VerificationReport> {
        let entries = self.entries(start_id, end_id)?;
        let Some(first) = entries.first() else {
            return Err(AuditError::NoEntriesInRange { start_id, end_id });
        };

        let anchor = match anchor {
            Some(hash) => hash.to_string(),
            None => self
                .store
                .entry_before(first.sequence_id)?
                .map(|prev| prev.curr_hash)
                .unwrap_or_else(|| GENESIS_HASH.to_string()),
        };
        debug!(start_id, end_id, anchor = %anchor, "verifying ledger window");

        let report = verify_entries(&entries, &anchor)?;
        log_report(&report, start_id, end_id);
        Ok(report)
    }

    /// Read-only access to a window of the ledger.
    pub fn entries(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>> {
        if start_id > end_id {
            return Err(AuditError::NoEntriesInRange { start_id, end_id });
        }
        self.store.entries_in_range(start_id, end_id)
    }

    pub fn last_entry(&self) -> AuditResult<Option<AuditEntry>> {
        self.store.last_entry()
    }

    pub fn len(&self) -> AuditResult<u64> {
        self.store.len()
    }

    pub fn is_empty(&self) -> AuditResult<bool> {
        self.store.is_empty()
    }
}

fn log_report(report: &VerificationReport, start_id: u64, end_id: u64) {
    match report.tampered_id {
        None => info!(start_id, end_id, count = report.count, "audit chain verified"),
        Some(tampered_id) => warn!(
            start_id,
            end_id,
            tampered_id,
            reason = ?report.reason,
            "audit chain tampering detected"
        ),
    }
}
