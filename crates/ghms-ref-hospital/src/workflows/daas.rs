//! Events from the data-as-a-service agent: shift summaries, staff
//! feedback on those summaries, and ward messaging.
//!
//! The agent runs out of process and submits raw JSON through the trusted
//! ingestion path, so these functions build events in the agent's own
//! shape (`event`, `user`, `meta`) and let the service normalize them.

use serde_json::json;

use ghms_audit::AuditService;
use ghms_contracts::{entry::AuditEntry, error::AuditResult};

use crate::mock_data::StaffMember;

/// Outcome a reviewer gives a generated shift summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLabel {
    Verified,
    Invalid,
}

impl FeedbackLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackLabel::Verified => "Verified",
            FeedbackLabel::Invalid => "Invalid",
        }
    }
}

pub fn shift_defined(
    service: &AuditService,
    token: &str,
    shift_id: u32,
    ward: &str,
) -> AuditResult<AuditEntry> {
    service.ingest(
        token,
        &json!({
            "event": "SHIFT_DEFINED",
            "object_type": "DaasShiftSummary",
            "object_id": shift_id,
            "meta": { "ward": ward },
        }),
    )
}

pub fn shift_feedback(
    service: &AuditService,
    token: &str,
    reviewer: &StaffMember,
    shift_id: u32,
    label: FeedbackLabel,
    note: &str,
) -> AuditResult<AuditEntry> {
    service.ingest(
        token,
        &json!({
            "event": "DAAS_SHIFT_FEEDBACK",
            "user": { "id": reviewer.id, "username": reviewer.username },
            "ip": reviewer.ip,
            "meta": {
                "object_type": "DaasShiftSummary",
                "object_id": shift_id,
                "shift_id": shift_id,
                "staff_id": reviewer.id,
                "label": label.as_str(),
                "note": note,
            },
        }),
    )
}

pub fn message_sent(
    service: &AuditService,
    token: &str,
    sender: &StaffMember,
    thread_id: u32,
) -> AuditResult<AuditEntry> {
    service.ingest(
        token,
        &json!({
            "action_code": "MSG_SENT",
            "user_id": sender.id,
            "extra_data": { "thread_id": thread_id, "sender_id": sender.id },
        }),
    )
}
