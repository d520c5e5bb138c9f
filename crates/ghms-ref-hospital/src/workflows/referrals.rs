//! Inter-facility referrals.
//!
//! Pushing a patient is done by a local clinician; acceptance and completion
//! arrive from the receiving facility's gateway and carry its address.

use ghms_audit::AuditService;
use ghms_contracts::{entry::AuditEntry, error::AuditResult, request::LogRequest};

use crate::mock_data::{Facility, Patient, StaffMember};

pub fn push_patient(
    service: &AuditService,
    clinician: &StaffMember,
    patient: &Patient,
    referral_id: u32,
    to: &Facility,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("PUSH_PATIENT")
            .actor(clinician.id.to_string())
            .object("Referral", referral_id.to_string())
            .ip(clinician.ip)
            .extra("patient", patient.upi)
            .extra("to_facility", to.code),
    )
}

pub fn accept_referral(
    service: &AuditService,
    referral_id: u32,
    at: &Facility,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("ACCEPT_REFERRAL")
            .object("Referral", referral_id.to_string())
            .ip(at.gateway_ip)
            .extra("facility", at.code),
    )
}

pub fn complete_referral(
    service: &AuditService,
    referral_id: u32,
    at: &Facility,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("COMPLETE_REFERRAL")
            .object("Referral", referral_id.to_string())
            .ip(at.gateway_ip)
            .extra("facility", at.code),
    )
}
