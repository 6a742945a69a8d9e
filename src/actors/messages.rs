//! Message types for actor communication
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages sent to a specific actor via mpsc
//! 2. **Events**: Broadcast notifications published to every subscriber
//! 3. **Immutability**: Events are cloneable for multi-subscriber patterns

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::types::{ActionKind, Host, HostId};

use super::machine::Phase;

/// Address of one host action state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub host_id: HostId,
    pub kind: ActionKind,
}

impl ActionKey {
    pub fn new(host_id: HostId, kind: ActionKind) -> Self {
        Self { host_id, kind }
    }
}

/// Event published whenever a log collection finishes successfully
///
/// Published regardless of host; the aggregate refresh pipeline reacts to
/// it by refreshing the alert table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCompleted {
    pub host_id: HostId,

    /// Hostname (for logging)
    pub hostname: String,

    /// Number of alerts the collection produced
    pub alerts: u32,

    /// When the result arrived
    pub timestamp: DateTime<Utc>,
}

/// Result of asking the orchestrator to trigger an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A new cycle started and the remote call was issued
    Started,

    /// The action is already in flight; nothing happened
    AlreadyInFlight,

    /// No host with that id is attached
    UnknownHost,
}

/// Commands that can be sent to the OrchestratorActor
#[derive(Debug)]
pub enum OrchestratorCommand {
    /// Create both state machines for a host and mount its row
    Attach { host: Host },

    /// Discard a host's state machines and unmount its row
    ///
    /// Pending revert timers are cancelled.
    Detach { host_id: HostId },

    /// Detach every attached host
    DetachAll {
        /// Number of hosts that were detached
        respond_to: oneshot::Sender<usize>,
    },

    /// Operator trigger of one host action
    Trigger {
        host_id: HostId,
        kind: ActionKind,
        respond_to: oneshot::Sender<TriggerOutcome>,
    },

    /// Get the current phase of one host action
    GetPhase {
        host_id: HostId,
        kind: ActionKind,
        respond_to: oneshot::Sender<Option<Phase>>,
    },

    /// Gracefully shut down the orchestrator
    ///
    /// All pending revert timers are cancelled.
    Shutdown,
}

/// Commands that can be sent to the AggregateActor
#[derive(Debug)]
pub enum AggregateCommand {
    /// Start an alert table refresh
    RefreshAlerts {
        /// Sequence number issued to the refresh
        respond_to: oneshot::Sender<u64>,
    },

    /// Get pipeline statistics
    GetStats {
        respond_to: oneshot::Sender<AggregateStats>,
    },

    /// Gracefully shut down the pipeline
    Shutdown,
}

/// Aggregate refresh pipeline statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Alert refreshes issued so far (also the latest sequence number)
    pub issued: u64,

    /// Sequence number of the refresh currently on screen
    pub rendered: Option<u64>,

    /// Refresh results dropped because a newer refresh was issued
    pub discarded: u64,

    /// Refreshes that failed
    pub failures: u64,

    /// Whether the offender chart has been drawn
    pub offenders_rendered: bool,
}
