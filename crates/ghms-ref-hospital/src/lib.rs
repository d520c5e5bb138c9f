//! # ghms-ref-hospital
//!
//! Reference hospital workflows for the GHMS audit ledger.
//!
//! `seed_demo_day` replays a compressed working day across reception, the
//! wards, laboratory, radiology, pharmacy, finance, referrals, and the
//! data-as-a-service agent, so every kind of audited action lands in the
//! ledger at least once.
//!
//! All data is hardcoded and fictional.  No external systems are contacted.

pub mod mock_data;
pub mod workflows;

use tracing::info;

use ghms_audit::AuditService;
use ghms_contracts::{
    entry::AuditEntry,
    error::{AuditError, AuditResult},
};

use mock_data::{
    staff_with_role, StaffMember, DAAS_AGENT_TOKEN, DRUGS, IMAGING_STUDIES, LAB_TESTS, PATIENTS,
    REFERRAL_FACILITIES, STAFF,
};
use workflows::{
    access, billing, clinical,
    daas::{self, FeedbackLabel},
    referrals,
};

fn on_duty(role: &str) -> AuditResult<&'static StaffMember> {
    staff_with_role(role).ok_or_else(|| AuditError::InvalidEvent {
        reason: format!("no staff member with role '{}'", role),
    })
}

/// Record one simulated working day and return the committed entries in
/// ledger order.
///
/// The DAAS events go through token-checked ingestion, so `service` must
/// trust `DAAS_AGENT_TOKEN`.
pub fn seed_demo_day(service: &AuditService) -> AuditResult<Vec<AuditEntry>> {
    let reception = on_duty("Reception")?;
    let doctor = on_duty("Doctor")?;
    let lab = on_duty("LabTech")?;
    let radiology = on_duty("Radiologist")?;
    let pharmacy = on_duty("Pharmacist")?;
    let finance = on_duty("Finance")?;
    let nurse = on_duty("Nurse")?;
    let patient = &PATIENTS[0];
    let facility = &REFERRAL_FACILITIES[0];

    let mut entries = Vec::new();

    // ── Accounts and sign-in ──────────────────────────────────────────────────

    for staff in STAFF {
        entries.push(access::user_created(service, staff)?);
    }
    entries.push(access::user_updated(service, nurse, &["role", "ward"])?);
    for staff in [reception, doctor, lab, radiology, pharmacy, finance, nurse] {
        entries.push(access::login(service, staff)?);
    }

    // ── Registration and consultation ─────────────────────────────────────────

    for p in PATIENTS {
        entries.push(clinical::register_patient(service, reception, p)?);
    }
    entries.push(clinical::view_patient(service, doctor, patient)?);

    // ── Orders and results ────────────────────────────────────────────────────

    for (offset, test) in LAB_TESTS.iter().enumerate() {
        let order_id = 500 + offset as u32;
        entries.push(clinical::create_lab_order(service, doctor, patient, order_id, test)?);
        entries.push(clinical::finalize_lab_result(service, lab, order_id, *test == "CBC")?);
    }
    entries.push(clinical::create_rad_order(service, doctor, patient, 80, IMAGING_STUDIES[0])?);
    entries.push(clinical::finalize_rad_report(service, radiology, 80)?);

    for (offset, (drug, quantity)) in DRUGS.iter().enumerate() {
        entries.push(clinical::dispense(service, pharmacy, 300 + offset as u32, drug, *quantity)?);
    }

    // ── Billing ───────────────────────────────────────────────────────────────

    let mut items: Vec<&str> = LAB_TESTS.to_vec();
    items.push(IMAGING_STUDIES[0]);
    items.extend(DRUGS.iter().map(|(drug, _)| *drug));
    entries.push(billing::invoice(service, finance, patient, 9001, &items)?);
    let total = billing::invoice_total(&items);
    entries.push(billing::payment_taken(service, finance, 7001, 9001, total, "M-PESA")?);

    // ── Referral ──────────────────────────────────────────────────────────────

    entries.push(referrals::push_patient(service, doctor, patient, 7, facility)?);
    entries.push(referrals::accept_referral(service, 7, facility)?);
    entries.push(clinical::patient_report_generated(service, doctor, patient)?);
    entries.push(referrals::complete_referral(service, 7, facility)?);

    // ── DAAS agent ────────────────────────────────────────────────────────────

    entries.push(daas::shift_defined(service, DAAS_AGENT_TOKEN, 3, "Maternity")?);
    entries.push(daas::shift_feedback(
        service,
        DAAS_AGENT_TOKEN,
        nurse,
        3,
        FeedbackLabel::Verified,
        "handover matches ward board",
    )?);
    entries.push(daas::message_sent(service, DAAS_AGENT_TOKEN, nurse, 12)?);

    // ── Sign-out ──────────────────────────────────────────────────────────────

    for staff in [reception, doctor, lab, radiology, pharmacy, finance, nurse] {
        entries.push(access::logout(service, staff)?);
    }

    info!(count = entries.len(), "seeded demo day");
    Ok(entries)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use ghms_audit::{AuditService, InMemoryLedgerStore};
    use ghms_config::AuditConfig;
    use ghms_contracts::{error::AuditError, verify::BreakReason};
    use ghms_core::{verify_chain, AuditLedger};

    use super::*;

    fn service_trusting(tokens: &[&str]) -> AuditService {
        let mut config = AuditConfig::default();
        config.ingest.trusted_tokens = tokens.iter().map(|t| t.to_string()).collect();
        AuditService::new(AuditLedger::new(Box::new(InMemoryLedgerStore::new())), config)
    }

    #[test]
    fn test_demo_day_produces_an_intact_chain() {
        let service = service_trusting(&[DAAS_AGENT_TOKEN]);
        let entries = seed_demo_day(&service).unwrap();

        assert_eq!(service.ledger().len().unwrap(), entries.len() as u64);
        for pair in entries.windows(2) {
            assert_eq!(pair[1].prev_hash, pair[0].curr_hash);
        }

        let report = service.verify_all().unwrap();
        assert!(report.verified);
        assert_eq!(report.count, entries.len());
    }

    #[test]
    fn test_demo_day_covers_every_action() {
        let service = service_trusting(&[DAAS_AGENT_TOKEN]);
        let actions: BTreeSet<String> = seed_demo_day(&service)
            .unwrap()
            .into_iter()
            .map(|e| e.fields.action)
            .collect();

        for expected in [
            "LOGIN",
            "LOGOUT",
            "USER_CREATED",
            "USER_UPDATED",
            "PATIENT_REGISTERED",
            "VIEW_PATIENT",
            "CREATE_LAB_ORDER_DB",
            "FINALIZE_LAB_RESULT_DB",
            "CREATE_RAD_ORDER_DB",
            "FINALIZE_RAD_REPORT_DB",
            "PHARM_DISPENSE_DB",
            "FINANCE_INVOICE_DB",
            "PAYMENT_TAKEN",
            "PUSH_PATIENT",
            "ACCEPT_REFERRAL",
            "COMPLETE_REFERRAL",
            "PATIENT_REPORT_GENERATED",
            "SHIFT_DEFINED",
            "DAAS_SHIFT_FEEDBACK",
            "MSG_SENT",
        ] {
            assert!(actions.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_demo_day_needs_trusted_agent_token() {
        let service = service_trusting(&[]);
        assert!(matches!(
            seed_demo_day(&service),
            Err(AuditError::UntrustedToken)
        ));
    }

    #[test]
    fn test_ingested_feedback_is_normalized() {
        let service = service_trusting(&[DAAS_AGENT_TOKEN]);
        let nurse = on_duty("Nurse").unwrap();
        let entry = daas::shift_feedback(
            &service,
            DAAS_AGENT_TOKEN,
            nurse,
            3,
            FeedbackLabel::Invalid,
            "wrong ward",
        )
        .unwrap();

        assert_eq!(entry.fields.actor_id.as_deref(), Some("41"));
        assert_eq!(entry.object_label(), "DaasShiftSummary#3");
        assert_eq!(entry.fields.extra["label"], json!("Invalid"));
    }

    #[test]
    fn test_invoice_total_comes_from_tariff() {
        let service = service_trusting(&[]);
        let finance = on_duty("Finance").unwrap();
        let entry = billing::invoice(&service, finance, &PATIENTS[1], 1, &["CBC", "LFT"]).unwrap();
        assert_eq!(entry.fields.extra["total_kes"], json!(2_300));
    }

    #[test]
    fn test_demo_day_payment_settles_the_invoice() {
        let service = service_trusting(&[DAAS_AGENT_TOKEN]);
        let entries = seed_demo_day(&service).unwrap();
        let field = |action: &str, key: &str| {
            entries
                .iter()
                .find(|e| e.fields.action == action)
                .and_then(|e| e.fields.extra.get(key).cloned())
                .unwrap()
        };

        assert_eq!(field("FINANCE_INVOICE_DB", "total_kes"), json!(5_670));
        assert_eq!(field("PAYMENT_TAKEN", "amount_kes"), json!(5_670));
    }

    #[test]
    fn test_editing_a_seeded_referral_is_detected() {
        let service = service_trusting(&[DAAS_AGENT_TOKEN]);
        let mut entries = seed_demo_day(&service).unwrap();
        let idx = entries
            .iter()
            .position(|e| e.fields.action == "PUSH_PATIENT")
            .unwrap();

        entries[idx]
            .fields
            .extra
            .insert("to_facility".to_string(), json!("MTRH"));

        let report = verify_chain(&entries).unwrap();
        assert_eq!(report.tampered_id, Some(entries[idx].sequence_id));
        assert_eq!(report.reason, Some(BreakReason::HashMismatch));
    }
}
