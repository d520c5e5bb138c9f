//! Registration, orders, results, and dispensing.

use ghms_audit::AuditService;
use ghms_contracts::{entry::AuditEntry, error::AuditResult, request::LogRequest};

use crate::mock_data::{Patient, StaffMember};

// ── Registration ──────────────────────────────────────────────────────────────

pub fn register_patient(
    service: &AuditService,
    clerk: &StaffMember,
    patient: &Patient,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("PATIENT_REGISTERED")
            .actor(clerk.id.to_string())
            .object("Patient", patient.upi)
            .ip(clerk.ip)
            .extra("national_id", patient.national_id),
    )
}

/// Every chart open is audited, including read-only views.
pub fn view_patient(
    service: &AuditService,
    viewer: &StaffMember,
    patient: &Patient,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("VIEW_PATIENT")
            .actor(viewer.id.to_string())
            .object("Patient", patient.upi)
            .ip(viewer.ip),
    )
}

pub fn patient_report_generated(
    service: &AuditService,
    author: &StaffMember,
    patient: &Patient,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("PATIENT_REPORT_GENERATED")
            .actor(author.id.to_string())
            .object("Patient", patient.upi)
            .ip(author.ip),
    )
}

// ── Laboratory ────────────────────────────────────────────────────────────────

pub fn create_lab_order(
    service: &AuditService,
    clinician: &StaffMember,
    patient: &Patient,
    order_id: u32,
    test: &str,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("CREATE_LAB_ORDER_DB")
            .actor(clinician.id.to_string())
            .object("LabOrder", order_id.to_string())
            .extra("patient", patient.upi)
            .extra("test", test),
    )
}

pub fn finalize_lab_result(
    service: &AuditService,
    tech: &StaffMember,
    order_id: u32,
    abnormal: bool,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("FINALIZE_LAB_RESULT_DB")
            .actor(tech.id.to_string())
            .object("LabOrder", order_id.to_string())
            .extra("abnormal", abnormal),
    )
}

// ── Radiology ─────────────────────────────────────────────────────────────────

pub fn create_rad_order(
    service: &AuditService,
    clinician: &StaffMember,
    patient: &Patient,
    order_id: u32,
    study: &str,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("CREATE_RAD_ORDER_DB")
            .actor(clinician.id.to_string())
            .object("ImagingOrder", order_id.to_string())
            .extra("patient", patient.upi)
            .extra("study", study),
    )
}

pub fn finalize_rad_report(
    service: &AuditService,
    radiologist: &StaffMember,
    order_id: u32,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("FINALIZE_RAD_REPORT_DB")
            .actor(radiologist.id.to_string())
            .object("ImagingOrder", order_id.to_string()),
    )
}

// ── Pharmacy ──────────────────────────────────────────────────────────────────

pub fn dispense(
    service: &AuditService,
    pharmacist: &StaffMember,
    prescription_id: u32,
    drug: &str,
    quantity: u32,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("PHARM_DISPENSE_DB")
            .actor(pharmacist.id.to_string())
            .object("Prescription", prescription_id.to_string())
            .extra("drug", drug)
            .extra("quantity", quantity),
    )
}
