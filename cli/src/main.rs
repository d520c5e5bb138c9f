//! GHMS audit ledger command-line tool.
//!
//! Appends, ingests, verifies, and exports entries of the configured ledger.
//!
//! Usage:
//!   ghms-audit --config audit.toml log --action LOGIN --actor 17 --ip 10.0.0.4
//!   ghms-audit ingest --token demo-token-123 --file events.json
//!   ghms-audit verify --start 1 --end 40
//!   ghms-audit export
//!   ghms-audit show --start 10 --end 12
//!   ghms-audit seed

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ghms_audit::AuditService;
use ghms_config::AuditConfig;
use ghms_contracts::{
    error::{AuditError, AuditResult},
    request::LogRequest,
};
use ghms_ref_hospital::{mock_data::DAAS_AGENT_TOKEN, seed_demo_day};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Tamper-evident audit ledger for the GHMS hospital system.
#[derive(Parser)]
#[command(
    name = "ghms-audit",
    about = "GHMS tamper-evident audit ledger",
    long_about = "Appends to, verifies, and exports the hash-chained GHMS audit ledger.\n\
                  Settings come from the TOML file given with --config, then from\n\
                  AUDIT_LEDGER_PATH, SIEM_EXPORT_PATH and AUDIT_TRUSTED_TOKENS."
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct Range {
    /// First sequence id (default: 1).
    #[arg(long)]
    start: Option<u64>,
    /// Last sequence id (default: the ledger tail).
    #[arg(long)]
    end: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Append one entry.
    Log {
        #[arg(long)]
        action: String,
        #[arg(long)]
        actor: Option<String>,
        #[arg(long)]
        object_type: Option<String>,
        #[arg(long)]
        object_id: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        /// Metadata as key=value; values that parse as JSON are kept typed.
        #[arg(long, value_parser = parse_extra)]
        extra: Vec<(String, Value)>,
    },
    /// Ingest raw JSON events (one object or an array) from a trusted agent.
    Ingest {
        #[arg(long)]
        token: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Verify the chain over a window; exits non-zero on tampering.
    Verify {
        #[command(flatten)]
        range: Range,
    },
    /// Print a paginated report of a window.
    Export {
        #[command(flatten)]
        range: Range,
    },
    /// Print entries of a window as JSON lines.
    Show {
        #[command(flatten)]
        range: Range,
    },
    /// Record a simulated hospital day through the reference workflows.
    Seed,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("ghms-audit: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command completed but found tampering.
fn run(cli: Cli) -> AuditResult<bool> {
    let mut config = load_config(cli.config)?;

    // The reference agent submits through token-checked ingestion.
    if matches!(cli.command, Command::Seed) && !config.is_trusted_token(DAAS_AGENT_TOKEN) {
        config.ingest.trusted_tokens.push(DAAS_AGENT_TOKEN.to_string());
    }

    let service = AuditService::from_config(config)?;

    match cli.command {
        Command::Log {
            action,
            actor,
            object_type,
            object_id,
            ip,
            extra,
        } => {
            let request = LogRequest {
                action,
                actor_id: actor,
                object_type,
                object_id,
                ip_address: ip,
                extra: extra.into_iter().collect(),
            };
            let entry = service.log(request)?;
            println!("{}", to_json(&entry)?);
        }
        Command::Ingest { token, file } => {
            let raw = fs::read_to_string(&file).map_err(|e| AuditError::InvalidEvent {
                reason: format!("cannot read '{}': {}", file.display(), e),
            })?;
            let value: Value = serde_json::from_str(&raw).map_err(|e| AuditError::InvalidEvent {
                reason: format!("'{}' is not JSON: {}", file.display(), e),
            })?;
            let entries = match value {
                Value::Array(events) => service.ingest_batch(&token, &events)?,
                single => vec![service.ingest(&token, &single)?],
            };
            println!("ingested {} event(s)", entries.len());
        }
        Command::Verify { range } => {
            let report = match (range.start, range.end) {
                (None, None) => service.verify_all()?,
                (start, end) => {
                    let (start, end) = resolve(&service, start, end)?;
                    service.verify_chain(start, end)?
                }
            };
            println!("{}", to_json(&report)?);
            return Ok(report.verified);
        }
        Command::Export { range } => {
            let (start, end) = resolve(&service, range.start, range.end)?;
            print!("{}", service.export(start, end)?);
        }
        Command::Show { range } => {
            let (start, end) = resolve(&service, range.start, range.end)?;
            for entry in service.entries(start, end)? {
                println!("{}", to_json(&entry)?);
            }
        }
        Command::Seed => {
            let entries = seed_demo_day(&service)?;
            let report = service.verify_all()?;
            println!(
                "seeded {} entries; ledger now holds {} and verified={}",
                entries.len(),
                report.count,
                report.verified
            );
            return Ok(report.verified);
        }
    }

    Ok(true)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<PathBuf>) -> AuditResult<AuditConfig> {
    let config = match path {
        Some(path) => AuditConfig::from_file(&path)?,
        None => AuditConfig::default(),
    };
    let config = config.apply_env()?;
    debug!(ledger = %config.ledger.path.display(), "configuration loaded");
    Ok(config)
}

/// Fill an open-ended window from the ledger tail.
fn resolve(service: &AuditService, start: Option<u64>, end: Option<u64>) -> AuditResult<(u64, u64)> {
    let end = match end {
        Some(end) => end,
        None => service
            .ledger()
            .last_entry()?
            .map_or(0, |tail| tail.sequence_id),
    };
    Ok((start.unwrap_or(1), end))
}

fn parse_extra(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

fn to_json<T: serde::Serialize>(value: &T) -> AuditResult<String> {
    serde_json::to_string(value).map_err(|e| AuditError::Serialization {
        reason: e.to_string(),
    })
}
