//! Presentation contract
//!
//! The core never draws anything itself. It hands declarative view
//! descriptions to a [`Renderer`], which builds or replaces the matching
//! presentation nodes. Renderers hold no business state: they only
//! reflect what the orchestrator and the refresh pipeline tell them.

mod error;
pub mod state;

use crate::types::{ActionKind, AlertRecord, Host, HostId, ProbeResult, Severity, TopOffenderStat};

pub use error::{RenderError, RenderErrorLog};
pub use state::{DashboardView, HostRow, SharedView};

/// Text of the neutral status region before any probe ran
pub const STATUS_PROMPT: &str = "Press status to probe";

/// Text shown while a probe is in flight
pub const STATUS_CONNECTING: &str = "Connecting...";

/// Placeholder row for an empty alert table
pub const NO_ALERTS: &str = "No alerts recorded";

/// Placeholder for an empty host roster
pub const NO_HOSTS: &str = "No hosts configured. Add hosts in the admin panel.";

/// Label of the offender chart series
pub const OFFENDER_SERIES: &str = "Incidents";

/// Colour intent of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Warning,
    Info,
    Muted,
    Danger,
}

/// Labelled metric value inside a host's status region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

impl Badge {
    fn new(label: &'static str, value: &str, tone: Tone) -> Self {
        let value = if value.is_empty() { "?" } else { value };

        Self {
            label,
            value: value.to_string(),
            tone,
        }
    }

    /// The four badges describing a probe result
    pub fn from_probe(probe: &ProbeResult) -> Vec<Badge> {
        let ram = if probe.free_ram_mb.is_empty() {
            String::new()
        } else {
            format!("{} MB", probe.free_ram_mb)
        };

        vec![
            Badge::new("RAM", &ram, Tone::Success),
            Badge::new("HDD", &probe.disk_info, Tone::Warning),
            Badge::new("CPU", &probe.cpu_load, Tone::Info),
            Badge::new("Uptime", &probe.uptime_hours, Tone::Muted),
        ]
    }
}

/// Transient appearance of one host action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionView {
    /// Pre-trigger appearance, affordance armed
    Neutral,

    /// Request in flight, affordance disabled
    Loading,

    /// Probe metrics (status check success)
    Badges(Vec<Badge>),

    /// Number of new alerts (log collection success)
    AlertCount { alerts: u32, tone: Tone },

    /// Failure indicator with a retry affordance
    Failed { message: String },
}

impl ActionView {
    pub fn collection_count(alerts: u32) -> Self {
        let tone = if alerts > 0 { Tone::Danger } else { Tone::Success };
        ActionView::AlertCount { alerts, tone }
    }

    /// Whether the operator may trigger the action from this view
    pub fn is_armed(&self) -> bool {
        !matches!(self, ActionView::Loading)
    }

    /// Caption of the action affordance
    pub fn affordance(&self, kind: ActionKind) -> String {
        match (self, kind) {
            (ActionView::Neutral, ActionKind::StatusCheck) => "Status".to_string(),
            (ActionView::Neutral, ActionKind::LogCollection) => "Logs".to_string(),
            (ActionView::Loading, _) => "…".to_string(),
            (ActionView::Badges(_), _) => "🔄".to_string(),
            (ActionView::AlertCount { alerts: 0, .. }, _) => "✅".to_string(),
            (ActionView::AlertCount { alerts, .. }, _) => format!("⚠ {alerts}"),
            (ActionView::Failed { .. }, _) => "Retry".to_string(),
        }
    }
}

/// One rendered row of the alert table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRow {
    pub timestamp: String,
    pub host_name: String,
    pub alert_type: String,
    pub source_ip: String,
    pub message: String,
    pub severity: Severity,
    pub tone: Tone,
}

impl From<&AlertRecord> for AlertRow {
    fn from(alert: &AlertRecord) -> Self {
        let tone = match alert.severity {
            Severity::Critical => Tone::Danger,
            Severity::Warning => Tone::Warning,
        };

        Self {
            timestamp: alert.local_timestamp(),
            host_name: alert.host_name.clone(),
            alert_type: alert.alert_type.clone(),
            source_ip: alert
                .source_ip
                .clone()
                .filter(|ip| !ip.is_empty())
                .unwrap_or_else(|| "-".to_string()),
            message: alert.message.clone(),
            severity: alert.severity,
            tone,
        }
    }
}

/// Full content of the alert table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTable {
    /// Single explanatory placeholder row
    Empty,
    Rows(Vec<AlertRow>),
}

impl AlertTable {
    /// Build the table in the order the server returned the alerts
    pub fn from_records(alerts: &[AlertRecord]) -> Self {
        if alerts.is_empty() {
            AlertTable::Empty
        } else {
            AlertTable::Rows(alerts.iter().map(AlertRow::from).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AlertTable::Empty => 0,
            AlertTable::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One bar of the offender chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffenderBar {
    pub ip: String,
    pub count: u64,
}

impl From<&TopOffenderStat> for OffenderBar {
    fn from(stat: &TopOffenderStat) -> Self {
        Self {
            ip: stat.ip.clone(),
            count: stat.count,
        }
    }
}

/// Whole-list placeholder of the host roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostListPlaceholder {
    /// Roster loaded but empty
    Empty,
    /// Roster could not be loaded; blocks the whole list
    Failed { message: String },
}

impl HostListPlaceholder {
    pub fn text(&self) -> String {
        match self {
            HostListPlaceholder::Empty => NO_HOSTS.to_string(),
            HostListPlaceholder::Failed { message } => format!("Host API error: {message}"),
        }
    }
}

/// Presentation surface driven by the core
///
/// Every method replaces the addressed node wholesale. Methods addressing a
/// host row fail with [`RenderError::MissingNode`] when the row does not
/// exist.
pub trait Renderer: Send + Sync + 'static {
    /// Remove every host row and placeholder from the host list
    fn clear_host_list(&self) -> Result<(), RenderError>;

    /// Show a single placeholder instead of the host list
    fn host_list_placeholder(&self, placeholder: HostListPlaceholder) -> Result<(), RenderError>;

    /// Mount a host row with both actions in their neutral appearance
    fn mount_host_row(&self, host: &Host) -> Result<(), RenderError>;

    /// Tear a host row down
    fn unmount_host_row(&self, host_id: HostId) -> Result<(), RenderError>;

    /// Replace the transient region of one host action
    fn host_action(&self, host_id: HostId, kind: ActionKind, view: ActionView)
    -> Result<(), RenderError>;

    /// Replace the alert table in full
    fn alert_table(&self, table: AlertTable) -> Result<(), RenderError>;

    /// Draw the offender chart
    fn offender_chart(&self, bars: Vec<OffenderBar>) -> Result<(), RenderError>;
}
