//! # ghms-config
//!
//! TOML-driven configuration for the GHMS audit ledger.
//!
//! The SIEM export path, trusted ingestion tokens and report limits live
//! here and are passed explicitly into the ledger and service constructors.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use ghms_config::AuditConfig;
//!
//! let config = AuditConfig::from_file(Path::new("audit.toml"))?.apply_env()?;
//! ```

pub mod loader;
pub mod settings;

pub use settings::{
    AuditConfig, ExportSettings, IngestSettings, LedgerSettings, SiemSettings, StoreBackend,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use ghms_contracts::error::AuditError;

    use crate::{
        loader::{ENV_LEDGER_PATH, ENV_SIEM_EXPORT_PATH, ENV_TRUSTED_TOKENS},
        AuditConfig, StoreBackend,
    };

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = AuditConfig::from_toml_str("").unwrap();
        assert_eq!(config, AuditConfig::default());
        assert_eq!(config.ledger.backend, StoreBackend::File);
        assert_eq!(config.ledger.path, PathBuf::from("audit_ledger.jsonl"));
        assert_eq!(config.export.page_size, 60);
        assert_eq!(config.export.line_width, 200);
        assert!(config.siem.export_path.is_none());
        assert!(config.ingest.trusted_tokens.is_empty());
    }

    #[test]
    fn default_retry_budget_matches_ledger() {
        assert_eq!(
            AuditConfig::default().ledger.max_append_retries,
            ghms_core::ledger::DEFAULT_APPEND_RETRIES
        );
    }

    #[test]
    fn full_document_parses() {
        let toml = r#"
            [ledger]
            backend = "memory"
            max_append_retries = 7

            [siem]
            export_path = "/var/log/ghms/siem_events.ndjson"

            [ingest]
            trusted_tokens = ["demo-token-123", "jac-agent"]

            [export]
            title = "Kenyatta Ward Audit"
            page_size = 40
        "#;

        let config = AuditConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.ledger.backend, StoreBackend::Memory);
        assert_eq!(config.ledger.max_append_retries, 7);
        assert_eq!(
            config.siem.export_path.as_deref(),
            Some(Path::new("/var/log/ghms/siem_events.ndjson"))
        );
        assert!(config.is_trusted_token("jac-agent"));
        assert!(!config.is_trusted_token("jac"));
        assert_eq!(config.export.title, "Kenyatta Ward Audit");
        assert_eq!(config.export.page_size, 40);
        assert_eq!(config.export.max_entries, 5000, "unset keys keep defaults");
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        let err = AuditConfig::from_toml_str("[ledger]\nbackend = \"postgres\"\n").unwrap_err();
        match err {
            AuditError::ConfigError { reason } => assert!(reason.contains("TOML")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn zero_page_size_fails_validation() {
        let err = AuditConfig::from_toml_str("[export]\npage_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn blank_token_fails_validation() {
        let err = AuditConfig::from_toml_str("[ingest]\ntrusted_tokens = [\" \"]\n").unwrap_err();
        assert!(err.to_string().contains("trusted_tokens"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = AuditConfig::default()
            .apply_overrides(lookup(&[
                (ENV_LEDGER_PATH, "/data/ledger.jsonl"),
                (ENV_SIEM_EXPORT_PATH, "/data/siem.ndjson"),
                (ENV_TRUSTED_TOKENS, "a, b,,c "),
            ]))
            .unwrap();

        assert_eq!(config.ledger.path, PathBuf::from("/data/ledger.jsonl"));
        assert_eq!(
            config.siem.export_path,
            Some(PathBuf::from("/data/siem.ndjson"))
        );
        assert_eq!(config.ingest.trusted_tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_siem_override_disables_feed() {
        let mut config = AuditConfig::default();
        config.siem.export_path = Some(PathBuf::from("siem.ndjson"));

        let config = config
            .apply_overrides(lookup(&[(ENV_SIEM_EXPORT_PATH, "")]))
            .unwrap();
        assert!(config.siem.export_path.is_none());
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]\npath = \"ward.jsonl\"").unwrap();

        let config = AuditConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ledger.path, PathBuf::from("ward.jsonl"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = AuditConfig::from_file(Path::new("/nonexistent/audit.toml")).unwrap_err();
        assert!(matches!(err, AuditError::ConfigError { .. }));
    }
}
