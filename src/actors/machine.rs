//! Host action state machine
//!
//! One instance exists per `(host, action kind)` pair.
//!
//! ```text
//!            trigger()                ok
//!   Idle ──────────────▶ InFlight ─────────▶ Success ──┐
//!    ▲                      │  err                      │ revert timer
//!    │                      └──────────▶ Error ─────────┤ (log collection only)
//!    └──────────────────────────────────────────────────┘
//! ```
//!
//! `trigger()` while in flight is a no-op. Every trigger starts a new
//! cycle; completions and timer expiries carry the cycle they belong to so
//! late arrivals from an older cycle are ignored.

use tokio::task::AbortHandle;

use crate::gateway::GatewayError;
use crate::types::{ActionKind, CollectionResult, ProbeResult};
use crate::view::{ActionView, Badge};

/// Lifecycle position of a host action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    InFlight,
    Success,
    Error,
}

/// Payload of a successful action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    Probe(ProbeResult),
    Collection(CollectionResult),
}

/// State of one host action
#[derive(Debug)]
pub struct HostActionState {
    kind: ActionKind,
    phase: Phase,
    result: Option<ActionOutput>,
    error: Option<GatewayError>,
    cycle: u64,
    revert_timer: Option<AbortHandle>,
}

impl HostActionState {
    pub fn new(kind: ActionKind) -> Self {
        Self::resuming(kind, 0)
    }

    /// Idle machine whose first trigger starts cycle `cycle + 1`
    ///
    /// Used when a host is re-attached so that results still in flight for
    /// the previous attachment can never match a new cycle.
    pub fn resuming(kind: ActionKind, cycle: u64) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            result: None,
            error: None,
            cycle,
            revert_timer: None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn result(&self) -> Option<&ActionOutput> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    pub fn has_pending_revert(&self) -> bool {
        self.revert_timer.is_some()
    }

    /// Start a new cycle
    ///
    /// Returns the new cycle number, or `None` when the action is already
    /// in flight. A pending revert timer is cancelled.
    pub fn trigger(&mut self) -> Option<u64> {
        if self.phase == Phase::InFlight {
            return None;
        }

        self.cancel_revert();
        self.cycle += 1;
        self.phase = Phase::InFlight;
        self.error = None;

        Some(self.cycle)
    }

    /// Apply the outcome of the remote call issued for `cycle`
    ///
    /// Returns the new phase, or `None` when the outcome is stale.
    pub fn complete(
        &mut self,
        cycle: u64,
        outcome: Result<ActionOutput, GatewayError>,
    ) -> Option<Phase> {
        if self.phase != Phase::InFlight || cycle != self.cycle {
            return None;
        }

        match outcome {
            Ok(output) => {
                self.phase = Phase::Success;
                self.result = Some(output);
            }
            Err(err) => {
                self.phase = Phase::Error;
                self.result = None;
                self.error = Some(err);
            }
        }

        Some(self.phase)
    }

    /// Fall back to idle when the revert timer of `cycle` fires
    ///
    /// Only log collections revert, and only out of a finished phase of the
    /// same cycle. Returns whether the state changed.
    pub fn revert(&mut self, cycle: u64) -> bool {
        let finished = matches!(self.phase, Phase::Success | Phase::Error);
        if !self.kind.auto_reverts() || !finished || cycle != self.cycle {
            return false;
        }

        self.revert_timer = None;
        self.phase = Phase::Idle;
        self.result = None;
        self.error = None;

        true
    }

    /// Remember the timer that will revert the current cycle
    pub fn arm_revert(&mut self, timer: AbortHandle) {
        self.cancel_revert();
        self.revert_timer = Some(timer);
    }

    pub fn cancel_revert(&mut self) {
        if let Some(timer) = self.revert_timer.take() {
            timer.abort();
        }
    }

    /// Appearance matching the current phase
    pub fn view(&self) -> ActionView {
        match self.phase {
            Phase::Idle => ActionView::Neutral,
            Phase::InFlight => ActionView::Loading,
            Phase::Success => match &self.result {
                Some(ActionOutput::Probe(probe)) => ActionView::Badges(Badge::from_probe(probe)),
                Some(ActionOutput::Collection(collection)) => {
                    ActionView::collection_count(collection.alerts)
                }
                None => ActionView::Neutral,
            },
            Phase::Error => ActionView::Failed {
                message: self
                    .error
                    .as_ref()
                    .map(|err| err.message().to_string())
                    .unwrap_or_default(),
            },
        }
    }
}

impl Drop for HostActionState {
    fn drop(&mut self) {
        self.cancel_revert();
    }
}
