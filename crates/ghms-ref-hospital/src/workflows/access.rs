//! Sign-in, sign-out, and account lifecycle events.

use ghms_audit::AuditService;
use ghms_contracts::{entry::AuditEntry, error::AuditResult, request::LogRequest};

use crate::mock_data::StaffMember;

pub fn login(service: &AuditService, staff: &StaffMember) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("LOGIN")
            .actor(staff.id.to_string())
            .ip(staff.ip)
            .extra("username", staff.username),
    )
}

pub fn logout(service: &AuditService, staff: &StaffMember) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("LOGOUT")
            .actor(staff.id.to_string())
            .ip(staff.ip),
    )
}

/// Account provisioning runs as the system, so the entry has no actor.
pub fn user_created(service: &AuditService, staff: &StaffMember) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("USER_CREATED")
            .object("auth.User", staff.id.to_string())
            .extra("username", staff.username)
            .extra("role", staff.role),
    )
}

pub fn user_updated(
    service: &AuditService,
    staff: &StaffMember,
    changed: &[&str],
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("USER_UPDATED")
            .object("auth.User", staff.id.to_string())
            .extra("username", staff.username)
            .extra("changed_fields", changed.to_vec()),
    )
}
