//! NDJSON feed of committed entries for a SIEM collector.
//!
//! Each committed entry becomes one line: an envelope with a fresh event id,
//! the export time, and the entry itself.  The feed is a copy; the ledger
//! file stays the source of truth.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use ghms_contracts::{
    entry::AuditEntry,
    error::{AuditError, AuditResult},
};
use ghms_core::traits::AuditSink;

/// Value of `SiemEvent::source` for every exported line.
pub const SIEM_SOURCE: &str = "ghms-audit";

/// One line of the SIEM feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiemEvent {
    pub event_id: Uuid,
    pub source: String,
    pub exported_at: DateTime<Utc>,
    pub entry: AuditEntry,
}

/// Appends one `SiemEvent` line per committed entry.
pub struct NdjsonSiemSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl NdjsonSiemSink {
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| sink_error(&path, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| sink_error(&path, e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for NdjsonSiemSink {
    fn emit(&self, entry: &AuditEntry) -> AuditResult<()> {
        let event = SiemEvent {
            event_id: Uuid::new_v4(),
            source: SIEM_SOURCE.to_string(),
            exported_at: Utc::now(),
            entry: entry.clone(),
        };
        let mut line = serde_json::to_vec(&event).map_err(|e| AuditError::SinkFailed {
            reason: format!("failed to encode SIEM event: {}", e),
        })?;
        line.push(b'\n');

        let mut file = self.file.lock().map_err(|e| AuditError::SinkFailed {
            reason: format!("SIEM sink lock poisoned: {}", e),
        })?;
        file.write_all(&line).map_err(|e| sink_error(&self.path, e))?;

        debug!(sequence_id = entry.sequence_id, event_id = %event.event_id, "entry exported to SIEM feed");
        Ok(())
    }
}

fn sink_error(path: &Path, e: std::io::Error) -> AuditError {
    AuditError::SinkFailed {
        reason: format!("'{}': {}", path.display(), e),
    }
}
