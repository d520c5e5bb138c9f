//! # ghms-audit
//!
//! Stores, export, and the ingestion surface of the GHMS tamper-evident
//! audit ledger.
//!
//! ## Overview
//!
//! Every audited action in the hospital system becomes an `AuditEntry`
//! linked to the previous entry by its SHA-256 hash.  Editing or deleting
//! any persisted entry breaks the chain, and `verify_chain` names the first
//! entry that no longer checks out.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ghms_audit::AuditService;
//! use ghms_config::AuditConfig;
//! use ghms_contracts::request::LogRequest;
//!
//! let service = AuditService::from_config(AuditConfig::default())?;
//! let entry = service.log(LogRequest::new("LOGIN").actor("17"))?;
//! let report = service.verify_chain(1, entry.sequence_id)?;
//! assert!(report.verified);
//! ```

pub mod file;
pub mod ingest;
pub mod memory;
pub mod report;
pub mod service;
pub mod sink;

pub use file::JsonlLedgerStore;
pub use memory::InMemoryLedgerStore;
pub use report::{AuditReport, ReportOptions};
pub use service::AuditService;
pub use sink::{NdjsonSiemSink, SiemEvent};

// ── Tests ─────────────────────────────────────────────────────────────────────
