//! The ingestion and query surface of the audit ledger.
//!
//! `AuditService` is what the rest of the hospital system talks to:
//! `log()` from in-process call sites, `ingest()` from trusted external
//! agents, and `verify_chain()` / `export()` for auditors.

use serde_json::Value;
use tracing::{error, info, warn};

use ghms_config::{AuditConfig, StoreBackend};
use ghms_contracts::{
    entry::AuditEntry,
    error::{AuditError, AuditResult},
    request::LogRequest,
    verify::VerificationReport,
};
use ghms_core::{traits::LedgerStore, AuditLedger};

use crate::{
    file::JsonlLedgerStore,
    ingest::normalize_event,
    memory::InMemoryLedgerStore,
    report::{build_report, AuditReport, ReportOptions},
    sink::NdjsonSiemSink,
};

pub struct AuditService {
    ledger: AuditLedger,
    config: AuditConfig,
}

impl AuditService {
    /// Wrap an already-assembled ledger.
    pub fn new(ledger: AuditLedger, config: AuditConfig) -> Self {
        Self { ledger, config }
    }

    /// Build the store, SIEM sink, and ledger described by `config`.
    pub fn from_config(config: AuditConfig) -> AuditResult<Self> {
        config.validate()?;

        let store: Box<dyn LedgerStore> = match config.ledger.backend {
            StoreBackend::Memory => Box::new(InMemoryLedgerStore::new()),
            StoreBackend::File => Box::new(JsonlLedgerStore::open(&config.ledger.path)?),
        };

        let mut ledger =
            AuditLedger::new(store).with_max_append_retries(config.ledger.max_append_retries);
        if let Some(path) = &config.siem.export_path {
            ledger = ledger.with_sink(Box::new(NdjsonSiemSink::open(path)?));
        }

        info!(
            backend = ?config.ledger.backend,
            siem = config.siem.export_path.is_some(),
            "audit service ready"
        );
        Ok(Self::new(ledger, config))
    }

    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Record an event.  Failures propagate to the caller.
    pub fn log(&self, request: LogRequest) -> AuditResult<AuditEntry> {
        self.ledger.append(request)
    }

    /// Record an event without letting an audit failure block the caller.
    ///
    /// A failed append is reported at `error!` level with the action code so
    /// the missing entry is visible to operators.
    pub fn log_best_effort(&self, request: LogRequest) -> Option<AuditEntry> {
        let action = request.action.clone();
        match self.ledger.append(request) {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!(action = %action, error = %e, "audit entry dropped");
                None
            }
        }
    }

    /// Record one raw JSON event from an external agent.
    pub fn ingest(&self, token: &str, raw: &Value) -> AuditResult<AuditEntry> {
        self.check_token(token)?;
        self.ledger.append(normalize_event(raw)?)
    }

    /// Record a batch of raw events.
    ///
    /// Every event is validated up front, so a malformed event rejects the
    /// batch before anything is appended.  A store failure midway still
    /// leaves the entries appended before it in the ledger.
    pub fn ingest_batch(&self, token: &str, raw: &[Value]) -> AuditResult<Vec<AuditEntry>> {
        self.check_token(token)?;
        let requests = raw
            .iter()
            .enumerate()
            .map(|(idx, event)| {
                normalize_event(event).map_err(|e| AuditError::InvalidEvent {
                    reason: format!("event {}: {}", idx, e),
                })
            })
            .collect::<AuditResult<Vec<_>>>()?;

        let entries = requests
            .into_iter()
            .map(|request| self.ledger.append(request))
            .collect::<AuditResult<Vec<_>>>()?;
        info!(count = entries.len(), "ingested audit batch");
        Ok(entries)
    }

    /// Verify the entries with `start_id <= sequence_id <= end_id`.
    pub fn verify_chain(&self, start_id: u64, end_id: u64) -> AuditResult<VerificationReport> {
        self.ledger.verify_range(start_id, end_id, None)
    }

    pub fn verify_all(&self) -> AuditResult<VerificationReport> {
        self.ledger.verify_all()
    }

    pub fn entries(&self, start_id: u64, end_id: u64) -> AuditResult<Vec<AuditEntry>> {
        self.ledger.entries(start_id, end_id)
    }

    /// Render a paginated report of a ledger window.
    pub fn export(&self, start_id: u64, end_id: u64) -> AuditResult<AuditReport> {
        let entries = self.ledger.entries(start_id, end_id)?;
        if entries.is_empty() {
            return Err(AuditError::NoEntriesInRange { start_id, end_id });
        }
        build_report(&entries, &ReportOptions::from(&self.config.export))
    }

    fn check_token(&self, token: &str) -> AuditResult<()> {
        if self.config.is_trusted_token(token) {
            Ok(())
        } else {
            warn!("rejected ingestion with untrusted token");
            Err(AuditError::UntrustedToken)
        }
    }
}
