//! Error types for the audit ledger.
//!
//! All fallible ledger operations return `AuditResult<T>`.  Tampering is
//! not represented here; it is a `VerificationReport` outcome.

use thiserror::Error;

/// The unified error type for the audit ledger crates.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The backing store could not be read or written.
    ///
    /// A failed append means the audited action has no entry, which is a
    /// compliance gap; callers must not swallow it.
    #[error("ledger store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Another writer appended first; the entry was built on a stale tail.
    #[error("append conflict: expected prev_hash '{expected}', store tail is '{actual}'")]
    ChainConflict { expected: String, actual: String },

    /// A persisted record could not be decoded.
    #[error("corrupt ledger record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// An entry could not be serialized into its canonical form.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The requested window holds no entries, or is malformed.
    #[error("no entries in range {start_id}..={end_id}")]
    NoEntriesInRange { start_id: u64, end_id: u64 },

    /// An ingestion call presented a token that is not trusted.
    #[error("ingestion token is not trusted")]
    UntrustedToken,

    /// A submitted event is missing required data or has the wrong shape.
    #[error("invalid audit event: {reason}")]
    InvalidEvent { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A downstream sink (e.g. the SIEM feed) rejected an entry.
    #[error("audit sink failed: {reason}")]
    SinkFailed { reason: String },

    /// A report could not be produced.
    #[error("export failed: {reason}")]
    ExportFailed { reason: String },
}

/// Convenience alias used throughout the ledger crates.
pub type AuditResult<T> = Result<T, AuditError>;
