//! Paginated, human-readable export of a ledger window.
//!
//! The report reads entries and never touches them.  Lines appear in
//! ascending ledger order:
//!
//! ```text
//!      3 | 2025-03-01 08:30:00 UTC | 17 | REFERRAL_CREATED | Referral#7 | 10.0.0.4
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ghms_config::ExportSettings;
use ghms_contracts::{
    entry::AuditEntry,
    error::{AuditError, AuditResult},
};

/// Layout knobs for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub title: String,
    pub page_size: usize,
    pub max_entries: usize,
    pub line_width: usize,
}

impl From<&ExportSettings> for ReportOptions {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            title: settings.title.clone(),
            page_size: settings.page_size.max(1),
            max_entries: settings.max_entries.max(1),
            line_width: settings.line_width,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&ExportSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPage {
    /// 1-based page number.
    pub number: usize,
    pub lines: Vec<String>,
}

/// A rendered export of a ledger window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub first_id: u64,
    pub last_id: u64,
    /// Entries rendered (at most `max_entries`).
    pub total_entries: usize,
    /// True when the window held more than `max_entries` entries.
    pub truncated: bool,
    pub pages: Vec<ReportPage>,
}

/// Format one entry as a report line, cut to `width` characters.
pub fn render_line(entry: &AuditEntry, width: usize) -> String {
    let line = format!(
        "{:>6} | {} | {} | {} | {} | {}",
        entry.sequence_id,
        entry.fields.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        entry.actor_label(),
        entry.fields.action,
        entry.object_label(),
        entry.fields.ip_address.as_deref().unwrap_or(""),
    );
    line.chars().take(width).collect()
}

/// Lay out `entries` (already in ledger order) into pages.
pub fn build_report(entries: &[AuditEntry], options: &ReportOptions) -> AuditResult<AuditReport> {
    let Some(first) = entries.first() else {
        return Err(AuditError::ExportFailed {
            reason: "nothing to export".to_string(),
        });
    };

    let shown = &entries[..entries.len().min(options.max_entries.max(1))];
    let pages = shown
        .chunks(options.page_size.max(1))
        .enumerate()
        .map(|(idx, chunk)| ReportPage {
            number: idx + 1,
            lines: chunk
                .iter()
                .map(|e| render_line(e, options.line_width))
                .collect(),
        })
        .collect();

    Ok(AuditReport {
        title: options.title.clone(),
        generated_at: Utc::now(),
        first_id: first.sequence_id,
        last_id: shown.last().map_or(first.sequence_id, |e| e.sequence_id),
        total_entries: shown.len(),
        truncated: shown.len() < entries.len(),
        pages,
    })
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page_count = self.pages.len();
        writeln!(f, "{}", self.title)?;
        writeln!(
            f,
            "Entries {}..={} ({}), generated {}",
            self.first_id,
            self.last_id,
            self.total_entries,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if self.truncated {
            writeln!(f, "(window truncated)")?;
        }
        for page in &self.pages {
            writeln!(f)?;
            writeln!(f, "── Page {}/{} ──", page.number, page_count)?;
            for line in &page.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}
