//! # ghms-core
//!
//! The hash-chain engine of the GHMS audit ledger.
//!
//! This crate provides:
//! - The trait seams (`LedgerStore`, `AuditSink`)
//! - Canonical serialization, hashing, and chain verification (`chain`)
//! - `AuditLedger`, which serializes appends so the chain never forks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ghms_contracts::request::LogRequest;
//! use ghms_core::AuditLedger;
//!
//! let ledger = AuditLedger::new(Box::new(store));
//! ledger.append(LogRequest::new("LOGIN").actor("17"))?;
//! assert!(ledger.verify_all()?.verified);
//! ```

pub mod chain;
pub mod ledger;
pub mod traits;

pub use chain::{compute_hash, verify_chain, verify_entries};
pub use ledger::AuditLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────
