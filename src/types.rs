//! Shared API types
//!
//! Wire representations of everything the remote API returns. These are
//! read-only snapshots: the client never mutates a host or an alert, it
//! only renders them.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a managed host, owned by the remote API
pub type HostId = u64;

/// Operating system family of a managed host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OsKind {
    Linux,
    /// Also covers any `os_type` the API reports other than LINUX
    #[serde(other)]
    Windows,
}

impl OsKind {
    /// Name of the probe endpoint for this OS family
    pub fn probe_endpoint(&self) -> &'static str {
        match self {
            OsKind::Linux => "ssh-info",
            OsKind::Windows => "windows-info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            OsKind::Linux => "🐧",
            OsKind::Windows => "🪟",
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsKind::Linux => write!(f, "LINUX"),
            OsKind::Windows => write!(f, "WINDOWS"),
        }
    }
}

/// A managed host as listed by `GET /api/hosts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub hostname: String,
    pub ip_address: String,
    #[serde(rename = "os_type")]
    pub os_kind: OsKind,
}

/// Operator-triggered action available on every host row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// On-demand health probe
    StatusCheck,
    /// Remote log collection and analysis
    LogCollection,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::StatusCheck, ActionKind::LogCollection];

    /// Whether a finished action falls back to its neutral view on its own
    pub fn auto_reverts(&self) -> bool {
        matches!(self, ActionKind::LogCollection)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::StatusCheck => write!(f, "status_check"),
            ActionKind::LogCollection => write!(f, "log_collection"),
        }
    }
}

/// Health metrics returned by a probe
///
/// Linux hosts report `free_ram_mb` as a string, Windows hosts may send a
/// number, so every field is normalized to text on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(deserialize_with = "text_or_number")]
    pub free_ram_mb: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub disk_info: String,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub disk_total: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub cpu_load: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub uptime_hours: String,
}

/// Summary returned by a log collection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    /// Number of alerts the analysis produced
    pub alerts: u32,
    #[serde(default)]
    pub message: Option<String>,
    /// Number of log records fetched
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Alert severity as stored by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp format used by the alert endpoint (UTC, no offset)
pub const ALERT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Alert record as listed by `GET /api/alerts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub timestamp: String,
    pub host_name: String,
    pub alert_type: String,
    #[serde(default)]
    pub source_ip: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl AlertRecord {
    /// Parse the server timestamp as UTC
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, ALERT_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Timestamp rendered in the operator's local time zone
    ///
    /// Falls back to the raw server string when it cannot be parsed.
    pub fn local_timestamp(&self) -> String {
        self.timestamp_utc()
            .map(|ts| ts.with_timezone(&Local).format(ALERT_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

/// Incident count for a single offending source address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOffenderStat {
    pub ip: String,
    pub count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text.trim().to_string(),
            TextOrNumber::Integer(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}
