//! # ghms-contracts
//!
//! Shared types and errors for the GHMS tamper-evident audit ledger.
//!
//! Every crate in the workspace imports from here.  No business logic lives
//! in this crate: only entry shapes, the logging request, verification
//! reports, and the error type.

pub mod entry;
pub mod error;
pub mod request;
pub mod verify;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use entry::{AuditEntry, EntryFields, PendingEntry, GENESIS_HASH};
    use error::AuditError;
    use request::LogRequest;
    use verify::{BreakReason, VerificationReport};

    fn fields(action: &str) -> EntryFields {
        LogRequest::new(action).into_fields(Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap())
    }

    // ── LogRequest ───────────────────────────────────────────────────────────

    #[test]
    fn log_request_builder_sets_every_field() {
        let req = LogRequest::new("PATIENT_REGISTERED")
            .actor("17")
            .object("Patient", "KEN-00001")
            .ip("10.0.0.4")
            .extra("national_id", "29384756");

        assert_eq!(req.action, "PATIENT_REGISTERED");
        assert_eq!(req.actor_id.as_deref(), Some("17"));
        assert_eq!(req.object_type.as_deref(), Some("Patient"));
        assert_eq!(req.object_id.as_deref(), Some("KEN-00001"));
        assert_eq!(req.ip_address.as_deref(), Some("10.0.0.4"));
        assert_eq!(req.extra["national_id"], json!("29384756"));
    }

    #[test]
    fn blank_references_normalize_to_none() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let fields = LogRequest::new("  LOGIN ")
            .actor("")
            .object("   ", "")
            .ip("")
            .into_fields(ts);

        assert_eq!(fields.action, "LOGIN");
        assert_eq!(fields.actor_id, None);
        assert_eq!(fields.object_type, None);
        assert_eq!(fields.object_id, None);
        assert_eq!(fields.ip_address, None);
        assert_eq!(fields.timestamp, ts);
    }

    #[test]
    fn empty_action_is_rejected() {
        let err = LogRequest::new("   ").validate().unwrap_err();
        assert!(matches!(err, AuditError::InvalidEvent { .. }));
        assert!(LogRequest::new("LOGIN").validate().is_ok());
    }

    #[test]
    fn later_extra_values_override_earlier_ones() {
        let req = LogRequest::new("MSG_SENT")
            .extra("thread_id", 3)
            .extra("thread_id", 4);
        assert_eq!(req.extra["thread_id"], json!(4));
    }

    // ── AuditEntry ───────────────────────────────────────────────────────────

    #[test]
    fn entry_serializes_flat() {
        let entry = AuditEntry::from_pending(
            5,
            PendingEntry {
                fields: fields("LOGIN"),
                prev_hash: GENESIS_HASH.to_string(),
                curr_hash: "ab".repeat(32),
            },
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["sequence_id"], json!(5));
        assert_eq!(value["action"], json!("LOGIN"));
        assert_eq!(value["prev_hash"], json!("GENESIS"));
        assert!(value.get("fields").is_none(), "fields must be flattened");

        let decoded: AuditEntry = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn entry_labels_default_for_system_events() {
        let entry = AuditEntry::from_pending(
            1,
            PendingEntry {
                fields: fields("USER_CREATED"),
                prev_hash: GENESIS_HASH.to_string(),
                curr_hash: String::new(),
            },
        );
        assert!(entry.is_genesis());
        assert_eq!(entry.actor_label(), "system");
        assert_eq!(entry.object_label(), "#");
    }

    // ── VerificationReport ───────────────────────────────────────────────────

    #[test]
    fn intact_report_omits_tamper_fields() {
        let json = serde_json::to_value(VerificationReport::intact(3)).unwrap();
        assert_eq!(json, json!({ "verified": true, "count": 3 }));
    }

    #[test]
    fn tampered_report_names_the_entry() {
        let report = VerificationReport::tampered(2, BreakReason::HashMismatch, 3);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            json!({ "verified": false, "tampered_id": 2, "count": 3, "reason": "hash_mismatch" })
        );
    }

    // ── AuditError display messages ──────────────────────────────────────────

    #[test]
    fn error_store_unavailable_display() {
        let err = AuditError::StoreUnavailable {
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ledger store unavailable"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn error_no_entries_in_range_display() {
        let err = AuditError::NoEntriesInRange {
            start_id: 10,
            end_id: 20,
        };
        assert_eq!(err.to_string(), "no entries in range 10..=20");
    }

    #[test]
    fn error_chain_conflict_display() {
        let err = AuditError::ChainConflict {
            expected: "aaa".to_string(),
            actual: "bbb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("aaa"));
        assert!(msg.contains("bbb"));
    }
}
