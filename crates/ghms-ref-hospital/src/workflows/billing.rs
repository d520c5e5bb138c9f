//! Invoicing and payments.

use ghms_audit::AuditService;
use ghms_contracts::{entry::AuditEntry, error::AuditResult, request::LogRequest};

use crate::mock_data::{price_for, Patient, StaffMember};

/// Price `items` from the mock tariff.
pub fn invoice_total(items: &[&str]) -> u32 {
    items.iter().map(|item| price_for(item)).sum()
}

/// Raise an invoice for `items`, totalled with `invoice_total`.
pub fn invoice(
    service: &AuditService,
    cashier: &StaffMember,
    patient: &Patient,
    invoice_id: u32,
    items: &[&str],
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("FINANCE_INVOICE_DB")
            .actor(cashier.id.to_string())
            .object("Invoice", invoice_id.to_string())
            .extra("patient", patient.upi)
            .extra("items", items.to_vec())
            .extra("total_kes", invoice_total(items)),
    )
}

pub fn payment_taken(
    service: &AuditService,
    cashier: &StaffMember,
    payment_id: u32,
    invoice_id: u32,
    amount: u32,
    method: &str,
) -> AuditResult<AuditEntry> {
    service.log(
        LogRequest::new("PAYMENT_TAKEN")
            .actor(cashier.id.to_string())
            .object("Payment", payment_id.to_string())
            .ip(cashier.ip)
            .extra("invoice", invoice_id)
            .extra("amount_kes", amount)
            .extra("method", method),
    )
}
