//! Chain verification report types.
//!
//! A broken chain is not an error: verification always produces a
//! `VerificationReport`, and the caller decides how to surface
//! "tampering detected".

use serde::{Deserialize, Serialize};

/// Why a particular entry failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakReason {
    /// The entry's `sequence_id` does not increase over its predecessor.
    SequenceOrder,
    /// The stored `prev_hash` does not match the previous entry's stored
    /// `curr_hash` (or the genesis/anchor hash for the first entry).
    PrevHashMismatch,
    /// The stored `curr_hash` does not match the hash recomputed from the
    /// entry's own fields.
    HashMismatch,
}

/// Outcome of verifying a window of the ledger.
///
/// Serializes as `{"verified": true, "count": 3}` or
/// `{"verified": false, "tampered_id": 2, "count": 3, "reason": "hash_mismatch"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every entry in the window checked out.
    pub verified: bool,

    /// `sequence_id` of the first offending entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tampered_id: Option<u64>,

    /// Number of entries in the verified window.
    pub count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BreakReason>,
}

impl VerificationReport {
    pub fn intact(count: usize) -> Self {
        Self {
            verified: true,
            tampered_id: None,
            count,
            reason: None,
        }
    }

    pub fn tampered(sequence_id: u64, reason: BreakReason, count: usize) -> Self {
        Self {
            verified: false,
            tampered_id: Some(sequence_id),
            count,
            reason: Some(reason),
        }
    }
}
