//! Hospital workflows that write to the audit ledger.
//!
//! Each module covers one department.  Every function performs (in the mock
//! sense) one user-visible action and records it through `AuditService`,
//! returning the committed entry.

pub mod access;
pub mod billing;
pub mod clinical;
pub mod daas;
pub mod referrals;
