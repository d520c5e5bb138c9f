//! Lenient normalization of externally submitted audit events.
//!
//! Agents and older call sites send events in several shapes.  Accepted
//! aliases:
//!
//! | Field        | Keys tried, in order                           |
//! |--------------|------------------------------------------------|
//! | action       | `action`, `action_code`, `event`               |
//! | actor        | `actor_id`, `actor`, `user_id`, `user`         |
//! | metadata     | `extra`, `extra_data`, `meta`, `details`       |
//! | ip address   | `ip_address`, `ip`                             |
//!
//! `object_type`/`object_id` fall back to keys of the same name inside the
//! metadata.  Client timestamps (`ts`, `timestamp`) are dropped: the ledger
//! stamps entries itself.

use serde_json::{Map, Value};
use tracing::debug;

use ghms_contracts::{
    entry::Extra,
    error::{AuditError, AuditResult},
    request::LogRequest,
};

const ACTION_KEYS: &[&str] = &["action", "action_code", "event"];
const ACTOR_KEYS: &[&str] = &["actor_id", "actor", "user_id", "user"];
const META_KEYS: &[&str] = &["extra", "extra_data", "meta", "details"];
const IP_KEYS: &[&str] = &["ip_address", "ip"];
const CLIENT_TIME_KEYS: &[&str] = &["ts", "timestamp"];

/// Convert one raw JSON event into a `LogRequest`.
pub fn normalize_event(raw: &Value) -> AuditResult<LogRequest> {
    let obj = raw.as_object().ok_or_else(|| AuditError::InvalidEvent {
        reason: "event must be a JSON object".to_string(),
    })?;

    let action = first_present(obj, ACTION_KEYS)
        .and_then(scalar_string)
        .ok_or_else(|| AuditError::InvalidEvent {
            reason: "event has no action code".to_string(),
        })?;

    let extra = first_present(obj, META_KEYS).map(metadata).unwrap_or_default();

    let object_type = obj
        .get("object_type")
        .or_else(|| extra.get("object_type"))
        .and_then(scalar_string);
    let object_id = obj
        .get("object_id")
        .or_else(|| extra.get("object_id"))
        .and_then(scalar_string);

    if CLIENT_TIME_KEYS.iter().any(|k| obj.contains_key(*k)) {
        debug!(action = %action, "ignoring client-supplied timestamp");
    }

    let request = LogRequest {
        action,
        actor_id: first_present(obj, ACTOR_KEYS).and_then(actor_ref),
        object_type,
        object_id,
        ip_address: first_present(obj, IP_KEYS).and_then(scalar_string),
        extra,
    };
    request.validate()?;
    Ok(request)
}

/// The first key from `keys` present with a non-null, non-blank value.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Strings as-is; numbers and booleans in their JSON form.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// An actor may be a bare id or an object carrying `id`/`pk`.
fn actor_ref(value: &Value) -> Option<String> {
    match value {
        Value::Object(actor) => actor
            .get("id")
            .or_else(|| actor.get("pk"))
            .and_then(scalar_string),
        other => scalar_string(other),
    }
}

/// Objects become the metadata map; anything else is kept under `"data"`.
fn metadata(value: &Value) -> Extra {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::String(s) => Extra::from([("data".to_string(), Value::String(s.clone()))]),
        other => Extra::from([("data".to_string(), Value::String(other.to_string()))]),
    }
}
