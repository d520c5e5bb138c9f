//! Configuration schema.
//!
//! An `AuditConfig` is deserialized from TOML.  Every table and key is
//! optional; omitted values take the defaults below.
//!
//! ```toml
//! [ledger]
//! backend = "file"              # or "memory"
//! path = "audit_ledger.jsonl"
//! max_append_retries = 3
//!
//! [siem]
//! export_path = "siem_events.ndjson"
//!
//! [ingest]
//! trusted_tokens = ["demo-token-123"]
//!
//! [export]
//! title = "Audit Log Export"
//! page_size = 60
//! max_entries = 5000
//! line_width = 200
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ghms_core::ledger::DEFAULT_APPEND_RETRIES;

pub const DEFAULT_LEDGER_PATH: &str = "audit_ledger.jsonl";
pub const DEFAULT_REPORT_TITLE: &str = "Audit Log Export";
pub const DEFAULT_PAGE_SIZE: usize = 60;
pub const DEFAULT_MAX_ENTRIES: usize = 5000;
pub const DEFAULT_LINE_WIDTH: usize = 200;

/// Which `LedgerStore` implementation backs the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// Process-local, lost on exit.  Tests and dry runs.
    Memory,
    /// Append-only JSON-lines file at `ledger.path`.
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub backend: StoreBackend,
    pub path: PathBuf,
    /// How often an append is retried after losing a race for the tail.
    pub max_append_retries: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: PathBuf::from(DEFAULT_LEDGER_PATH),
            max_append_retries: DEFAULT_APPEND_RETRIES,
        }
    }
}

/// Where committed entries are mirrored for the security team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiemSettings {
    /// NDJSON file the SIEM collector tails.  `None` disables the feed.
    pub export_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Tokens accepted by the JSON ingestion path.  Empty rejects all.
    pub trusted_tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub title: String,
    /// Lines per report page.
    pub page_size: usize,
    /// Upper bound on entries rendered in one report.
    pub max_entries: usize,
    /// Lines longer than this are cut.
    pub line_width: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_entries: DEFAULT_MAX_ENTRIES,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// The top-level structure deserialized from a TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub ledger: LedgerSettings,
    pub siem: SiemSettings,
    pub ingest: IngestSettings,
    pub export: ExportSettings,
}
