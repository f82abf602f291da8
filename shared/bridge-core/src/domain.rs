//! Core domain types shared by the backend client and the operator console

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned call identifier (the provider's call SID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(pub String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One historical or in-progress call leg, exactly as the backend reports it.
///
/// Records are read-only snapshots: the console never edits one, it replaces
/// the whole collection on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: CallId,
    /// ISO-8601 creation instant
    pub timestamp: String,
    pub agent_number: String,
    pub customer_number: String,
    /// Raw backend status, arbitrary casing and separators
    pub status: String,
    /// Seconds; 0 means not yet measured
    #[serde(default)]
    pub duration: u64,
}

impl CallRecord {
    /// Parse `timestamp`. Offset-less timestamps are taken as UTC.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.timestamp.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts);
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0
    }
}

/// A pre-known dialing target used by the triple call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub phone_number: String,
    pub name: String,
}

impl Lead {
    pub fn new(id: impl Into<String>, phone_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phone_number: phone_number.into(),
            name: name.into(),
        }
    }
}
