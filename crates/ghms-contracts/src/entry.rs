//! Audit entry types.
//!
//! `EntryFields` is the hashed content of an entry.  `PendingEntry` is an
//! entry that has been hashed but not yet given a position by the store, and
//! `AuditEntry` is the committed, immutable ledger row.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `prev_hash` of the first entry in every ledger.
pub const GENESIS_HASH: &str = "GENESIS";

/// Open metadata attached to an entry.
///
/// A `BTreeMap` keeps the top level ordered; nested objects are
/// canonicalized separately before hashing.
pub type Extra = BTreeMap<String, Value>;

/// Every field of an entry that contributes to its hash, apart from
/// `prev_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFields {
    /// When the audited action happened (UTC, microsecond precision).
    ///
    /// Set by the ledger at append time; callers cannot supply it.
    pub timestamp: DateTime<Utc>,

    /// Short action code, e.g. `"LOGIN"` or `"PATIENT_REGISTERED"`.
    pub action: String,

    /// The acting principal.  `None` for system-initiated events.
    #[serde(default)]
    pub actor_id: Option<String>,

    /// Kind of the affected domain entity, e.g. `"Patient"`.
    #[serde(default)]
    pub object_type: Option<String>,

    /// Identifier of the affected domain entity, e.g. `"KEN-00001"`.
    #[serde(default)]
    pub object_id: Option<String>,

    /// Client address of the request that caused the event, if known.
    #[serde(default)]
    pub ip_address: Option<String>,

    /// Arbitrary JSON metadata.
    #[serde(default)]
    pub extra: Extra,
}

/// A hashed entry waiting for the store to assign its `sequence_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub fields: EntryFields,
    pub prev_hash: String,
    pub curr_hash: String,
}

/// A committed ledger entry.
///
/// Entries are never updated or deleted.  Changing any field, including
/// anything nested inside `extra`, makes `curr_hash` disagree with the
/// recomputed hash, which chain verification reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the ledger, assigned by the store.  Strictly increasing.
    pub sequence_id: u64,

    #[serde(flatten)]
    pub fields: EntryFields,

    /// `curr_hash` of the preceding entry, or [`GENESIS_HASH`].
    pub prev_hash: String,

    /// Lowercase hex SHA-256 of the canonical serialization.
    pub curr_hash: String,
}

impl AuditEntry {
    /// Commit a pending entry at the given position.
    pub fn from_pending(sequence_id: u64, pending: PendingEntry) -> Self {
        Self {
            sequence_id,
            fields: pending.fields,
            prev_hash: pending.prev_hash,
            curr_hash: pending.curr_hash,
        }
    }

    /// True if this entry claims to be the first entry of the ledger.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash == GENESIS_HASH
    }

    /// The actor id, or `"system"` when the event had no actor.
    pub fn actor_label(&self) -> &str {
        self.fields.actor_id.as_deref().unwrap_or("system")
    }

    /// `"<type>#<id>"`, with empty parts for absent references.
    pub fn object_label(&self) -> String {
        format!(
            "{}#{}",
            self.fields.object_type.as_deref().unwrap_or(""),
            self.fields.object_id.as_deref().unwrap_or("")
        )
    }
}
