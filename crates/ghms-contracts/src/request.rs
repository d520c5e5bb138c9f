//! The logging call contract.
//!
//! Every component that wants something on the audit trail builds a
//! `LogRequest` and hands it to the ledger.  Optional references are
//! normalized here so that `""` and "absent" hash identically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    entry::{EntryFields, Extra},
    error::{AuditError, AuditResult},
};

/// A single audit event as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRequest {
    pub action: String,
    pub actor_id: Option<String>,
    pub object_type: Option<String>,
    pub object_id: Option<String>,
    pub ip_address: Option<String>,
    pub extra: Extra,
}

impl LogRequest {
    /// Start a request for the given action code.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Attribute the event to a principal.
    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Reference the affected domain entity.
    pub fn object(mut self, object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self.object_id = Some(object_id.into());
        self
    }

    pub fn ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Add one metadata key.  Later values for the same key win.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merge a whole metadata map into the request.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra.extend(extra);
        self
    }

    /// Reject requests that cannot form a meaningful entry.
    pub fn validate(&self) -> AuditResult<()> {
        if self.action.trim().is_empty() {
            return Err(AuditError::InvalidEvent {
                reason: "action code must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Turn the request into hashable fields stamped with `timestamp`.
    ///
    /// Blank optional strings become `None` and the action code is trimmed.
    pub fn into_fields(self, timestamp: DateTime<Utc>) -> EntryFields {
        EntryFields {
            timestamp,
            action: self.action.trim().to_string(),
            actor_id: non_blank(self.actor_id),
            object_type: non_blank(self.object_type),
            object_id: non_blank(self.object_id),
            ip_address: non_blank(self.ip_address),
            extra: self.extra,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
