//! Hash-chain primitives: canonical serialization, hashing, and chain
//! verification.
//!
//! Hash input is the UTF-8 encoding of one JSON object with exactly these
//! keys, sorted, compact separators, absent optionals as `null`:
//!
//!   action, actor_id, extra, ip_address, object_id, object_type,
//!   prev_hash, timestamp
//!
//! `timestamp` is RFC 3339 UTC with six fractional digits and a `Z` suffix.
//! Objects nested inside `extra` are re-keyed in sorted order, so the digest
//! does not depend on how a caller happened to build its metadata.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use ghms_contracts::{
    entry::{AuditEntry, EntryFields, GENESIS_HASH},
    error::{AuditError, AuditResult},
    verify::{BreakReason, VerificationReport},
};

/// The current time at the precision the ledger stores.
pub fn entry_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp the way it appears in the hash input.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rebuild `value` with every object's keys in sorted order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn opt(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// The exact bytes that are fed to SHA-256 for an entry.
pub fn canonical_bytes(prev_hash: &str, fields: &EntryFields) -> AuditResult<Vec<u8>> {
    let mut extra = Map::new();
    for (key, value) in &fields.extra {
        extra.insert(key.clone(), canonicalize(value));
    }

    // Inserted in sorted key order.
    let mut doc = Map::new();
    doc.insert("action".to_string(), Value::String(fields.action.clone()));
    doc.insert("actor_id".to_string(), opt(&fields.actor_id));
    doc.insert("extra".to_string(), Value::Object(extra));
    doc.insert("ip_address".to_string(), opt(&fields.ip_address));
    doc.insert("object_id".to_string(), opt(&fields.object_id));
    doc.insert("object_type".to_string(), opt(&fields.object_type));
    doc.insert("prev_hash".to_string(), Value::String(prev_hash.to_string()));
    doc.insert(
        "timestamp".to_string(),
        Value::String(canonical_timestamp(&fields.timestamp)),
    );

    serde_json::to_vec(&Value::Object(doc)).map_err(|e| AuditError::Serialization {
        reason: format!("failed to encode canonical entry: {}", e),
    })
}

/// Compute the SHA-256 hash of an entry chained onto `prev_hash`.
///
/// Returns a lowercase 64-character hex string.
pub fn compute_hash(prev_hash: &str, fields: &EntryFields) -> AuditResult<String> {
    let bytes = canonical_bytes(prev_hash, fields)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Verify a window of entries against an anchor hash.
///
/// `anchor` is the hash the first entry's `prev_hash` must equal:
/// [`GENESIS_HASH`] for a window that starts the ledger, or the stored
/// `curr_hash` of the entry just before the window.
///
/// For each entry, in order:
///
/// 1. `sequence_id` must be greater than the previous entry's.
/// 2. `prev_hash` must equal the expected hash (the anchor, then each
///    previous entry's *stored* `curr_hash`).
/// 3. `curr_hash` must equal the hash recomputed from the entry's fields.
///
/// The first failure is reported by `sequence_id`.  An empty window is
/// intact with `count = 0`.
pub fn verify_entries(entries: &[AuditEntry], anchor: &str) -> AuditResult<VerificationReport> {
    let count = entries.len();
    let mut expected_prev = anchor.to_string();
    let mut last_sequence: Option<u64> = None;

    for entry in entries {
        if matches!(last_sequence, Some(prev) if entry.sequence_id <= prev) {
            return Ok(VerificationReport::tampered(
                entry.sequence_id,
                BreakReason::SequenceOrder,
                count,
            ));
        }

        if entry.prev_hash != expected_prev {
            return Ok(VerificationReport::tampered(
                entry.sequence_id,
                BreakReason::PrevHashMismatch,
                count,
            ));
        }

        let recomputed = compute_hash(&entry.prev_hash, &entry.fields)?;
        if entry.curr_hash != recomputed {
            return Ok(VerificationReport::tampered(
                entry.sequence_id,
                BreakReason::HashMismatch,
                count,
            ));
        }

        expected_prev = entry.curr_hash.clone();
        last_sequence = Some(entry.sequence_id);
    }

    Ok(VerificationReport::intact(count))
}

/// Verify a full ledger, starting from the genesis sentinel.
pub fn verify_chain(entries: &[AuditEntry]) -> AuditResult<VerificationReport> {
    verify_entries(entries, GENESIS_HASH)
}
