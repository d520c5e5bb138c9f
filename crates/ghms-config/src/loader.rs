//! Loading, overriding, and validating `AuditConfig`.
//!
//! Precedence: built-in defaults < TOML file < environment overrides.

use std::path::{Path, PathBuf};

use tracing::debug;

use ghms_contracts::error::{AuditError, AuditResult};

use crate::settings::{AuditConfig, StoreBackend};

/// Overrides `ledger.path`.
pub const ENV_LEDGER_PATH: &str = "AUDIT_LEDGER_PATH";
/// Overrides `siem.export_path`.  An empty value disables the feed.
pub const ENV_SIEM_EXPORT_PATH: &str = "SIEM_EXPORT_PATH";
/// Overrides `ingest.trusted_tokens` with a comma-separated list.
pub const ENV_TRUSTED_TOKENS: &str = "AUDIT_TRUSTED_TOKENS";

impl AuditConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `AuditError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or fails validation.
    pub fn from_toml_str(s: &str) -> AuditResult<Self> {
        let config: AuditConfig = toml::from_str(s).map_err(|e| AuditError::ConfigError {
            reason: format!("failed to parse audit config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AuditError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "loaded audit config");
        Self::from_toml_str(&contents)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> AuditResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup, then re-validate.
    pub fn apply_overrides<F>(mut self, lookup: F) -> AuditResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LEDGER_PATH) {
            debug!(path = %path, "ledger path overridden from environment");
            self.ledger.path = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_SIEM_EXPORT_PATH) {
            self.siem.export_path = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Some(tokens) = lookup(ENV_TRUSTED_TOKENS) {
            self.ingest.trusted_tokens = tokens
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values the ledger cannot run with.
    pub fn validate(&self) -> AuditResult<()> {
        if self.ledger.backend == StoreBackend::File && self.ledger.path.as_os_str().is_empty() {
            return Err(config_error("ledger.path must be set for the file backend"));
        }
        if self.export.page_size == 0 {
            return Err(config_error("export.page_size must be at least 1"));
        }
        if self.export.max_entries == 0 {
            return Err(config_error("export.max_entries must be at least 1"));
        }
        if self.export.line_width < 20 {
            return Err(config_error("export.line_width must be at least 20"));
        }
        if self.ingest.trusted_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(config_error("ingest.trusted_tokens must not contain blank tokens"));
        }
        Ok(())
    }

    /// True if `token` is one of the configured ingestion tokens.
    pub fn is_trusted_token(&self, token: &str) -> bool {
        self.ingest.trusted_tokens.iter().any(|t| t == token)
    }
}

fn config_error(reason: &str) -> AuditError {
    AuditError::ConfigError {
        reason: reason.to_string(),
    }
}
