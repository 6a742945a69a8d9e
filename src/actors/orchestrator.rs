//! OrchestratorActor - Owns every host action state machine
//!
//! The actor is the single writer of the `(host, action) → state` arena.
//! Remote calls and revert timers run as detached tasks that report back
//! through an internal channel, so the actor never waits on the network
//! and one host's action never blocks another's.
//!
//! ## Message Flow
//!
//! ```text
//! Trigger ─▶ machine.trigger() ─▶ spawn gateway call ─▶ Finished ─▶ machine.complete()
//!                                                                     │
//!                                   ┌─────────────────────────────────┤
//!                                   ▼                                 ▼
//!                 spawn revert timer (log collection)     publish CollectionCompleted
//!                                   │
//!                                   ▼
//!                      RevertElapsed ─▶ machine.revert()
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, instrument, trace, warn};

use crate::gateway::{GatewayError, RemoteGateway};
use crate::types::{ActionKind, Host, HostId, OsKind};
use crate::view::{ActionView, RenderErrorLog, Renderer};

use super::machine::{ActionOutput, HostActionState, Phase};
use super::messages::{ActionKey, CollectionCompleted, OrchestratorCommand, TriggerOutcome};

/// Default window after which a finished log collection reverts
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_secs(3);

/// Reports from detached tasks back to the actor
#[derive(Debug)]
enum ActionEvent {
    /// A remote call finished
    Finished {
        key: ActionKey,
        cycle: u64,
        outcome: Result<ActionOutput, GatewayError>,
    },

    /// A revert timer expired
    RevertElapsed { key: ActionKey, cycle: u64 },
}

/// Actor driving the per-host action lifecycle
pub struct OrchestratorActor {
    /// Remote API
    gateway: Arc<dyn RemoteGateway>,

    /// Presentation surface
    renderer: Arc<dyn Renderer>,

    /// Attached hosts
    hosts: HashMap<HostId, Host>,

    /// One state machine per attached (host, action) pair
    machines: HashMap<ActionKey, HostActionState>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<OrchestratorCommand>,

    /// Sender handed to spawned calls and timers
    event_tx: mpsc::UnboundedSender<ActionEvent>,

    /// Reports from spawned calls and timers
    event_rx: mpsc::UnboundedReceiver<ActionEvent>,

    /// Broadcast sender for collection completions
    collection_tx: broadcast::Sender<CollectionCompleted>,

    /// Auto-revert window for log collections
    revert_delay: Duration,

    /// Highest cycle any discarded machine reached; new machines start above it
    retired_cycle: u64,

    render_errors: RenderErrorLog,
}

impl OrchestratorActor {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
        command_rx: mpsc::Receiver<OrchestratorCommand>,
        collection_tx: broadcast::Sender<CollectionCompleted>,
        revert_delay: Duration,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            gateway,
            renderer,
            hosts: HashMap::new(),
            machines: HashMap::new(),
            command_rx,
            event_tx,
            event_rx,
            collection_tx,
            revert_delay,
            retired_cycle: 0,
            render_errors: RenderErrorLog::new(),
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command arrives or every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting orchestrator");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        warn!("command channel closed, shutting down");
                        break;
                    };

                    if !self.handle_command(cmd) {
                        break;
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
            }
        }

        // dropping the machines aborts their revert timers
        self.machines.clear();
        debug!("orchestrator stopped");
    }

    /// Returns `false` when the actor should stop
    fn handle_command(&mut self, cmd: OrchestratorCommand) -> bool {
        match cmd {
            OrchestratorCommand::Attach { host } => self.attach(host),

            OrchestratorCommand::Detach { host_id } => self.detach(host_id),

            OrchestratorCommand::DetachAll { respond_to } => {
                let ids: Vec<HostId> = self.hosts.keys().copied().collect();
                for host_id in &ids {
                    self.detach(*host_id);
                }
                let _ = respond_to.send(ids.len());
            }

            OrchestratorCommand::Trigger {
                host_id,
                kind,
                respond_to,
            } => {
                let outcome = self.trigger(ActionKey::new(host_id, kind));
                let _ = respond_to.send(outcome);
            }

            OrchestratorCommand::GetPhase {
                host_id,
                kind,
                respond_to,
            } => {
                let phase = self
                    .machines
                    .get(&ActionKey::new(host_id, kind))
                    .map(HostActionState::phase);
                let _ = respond_to.send(phase);
            }

            OrchestratorCommand::Shutdown => {
                debug!("received shutdown command");
                return false;
            }
        }

        true
    }

    fn handle_event(&mut self, event: ActionEvent) {
        match event {
            ActionEvent::Finished {
                key,
                cycle,
                outcome,
            } => self.finish(key, cycle, outcome),

            ActionEvent::RevertElapsed { key, cycle } => {
                let reverted = self
                    .machines
                    .get_mut(&key)
                    .is_some_and(|machine| machine.revert(cycle));

                if reverted {
                    trace!(host_id = key.host_id, kind = %key.kind, "reverted to neutral");
                    self.paint(key, ActionView::Neutral);
                }
            }
        }
    }

    fn attach(&mut self, host: Host) {
        if self.hosts.contains_key(&host.id) {
            debug!(host_id = host.id, "host re-attached, discarding previous state");
            self.discard_machines(host.id);
        }

        for kind in ActionKind::ALL {
            self.machines
                .insert(
                    ActionKey::new(host.id, kind),
                    HostActionState::resuming(kind, self.retired_cycle),
                );
        }

        let result = self.renderer.mount_host_row(&host);
        self.render_errors.check(result);

        trace!(host_id = host.id, hostname = %host.hostname, "attached host");
        self.hosts.insert(host.id, host);
    }

    fn detach(&mut self, host_id: HostId) {
        if self.hosts.remove(&host_id).is_none() {
            debug!(host_id, "detach of unknown host ignored");
            return;
        }

        self.discard_machines(host_id);

        let result = self.renderer.unmount_host_row(host_id);
        self.render_errors.check(result);

        trace!(host_id, "detached host");
    }

    fn discard_machines(&mut self, host_id: HostId) {
        for kind in ActionKind::ALL {
            if let Some(mut machine) = self.machines.remove(&ActionKey::new(host_id, kind)) {
                self.retired_cycle = self.retired_cycle.max(machine.cycle());
                machine.cancel_revert();
            }
        }
    }

    #[instrument(skip(self), fields(host_id = key.host_id, kind = %key.kind))]
    fn trigger(&mut self, key: ActionKey) -> TriggerOutcome {
        let Some(os_kind) = self.hosts.get(&key.host_id).map(|host| host.os_kind) else {
            warn!("trigger for unknown host");
            return TriggerOutcome::UnknownHost;
        };

        let Some(machine) = self.machines.get_mut(&key) else {
            return TriggerOutcome::UnknownHost;
        };

        let Some(cycle) = machine.trigger() else {
            debug!("already in flight, trigger ignored");
            return TriggerOutcome::AlreadyInFlight;
        };

        let call = self.dispatch(key.host_id, os_kind, key.kind);

        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = call.await;
            // the actor may be gone already; the result is simply dropped then
            let _ = event_tx.send(ActionEvent::Finished {
                key,
                cycle,
                outcome,
            });
        });

        self.paint(key, ActionView::Loading);
        TriggerOutcome::Started
    }

    /// Remote call backing an action kind
    fn dispatch(
        &self,
        host_id: HostId,
        os_kind: OsKind,
        kind: ActionKind,
    ) -> BoxFuture<'static, Result<ActionOutput, GatewayError>> {
        let gateway = self.gateway.clone();

        match kind {
            ActionKind::StatusCheck => async move {
                gateway
                    .probe_host(host_id, os_kind)
                    .await
                    .map(ActionOutput::Probe)
            }
            .boxed(),

            ActionKind::LogCollection => async move {
                gateway
                    .trigger_collection(host_id)
                    .await
                    .map(ActionOutput::Collection)
            }
            .boxed(),
        }
    }

    #[instrument(skip(self, outcome), fields(host_id = key.host_id, kind = %key.kind))]
    fn finish(&mut self, key: ActionKey, cycle: u64, outcome: Result<ActionOutput, GatewayError>) {
        let Some(machine) = self.machines.get_mut(&key) else {
            debug!("result for detached host dropped");
            return;
        };

        let Some(phase) = machine.complete(cycle, outcome) else {
            debug!(cycle, "stale result dropped");
            return;
        };

        if let Some(err) = machine.error() {
            warn!("action failed: {err}");
        }

        if key.kind.auto_reverts() {
            let event_tx = self.event_tx.clone();
            let delay = self.revert_delay;
            let timer = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = event_tx.send(ActionEvent::RevertElapsed { key, cycle });
            });
            machine.arm_revert(timer.abort_handle());
        }

        let view = machine.view();
        let alerts = match machine.result() {
            Some(ActionOutput::Collection(collection)) if phase == Phase::Success => {
                Some(collection.alerts)
            }
            _ => None,
        };

        self.paint(key, view);

        if let Some(alerts) = alerts {
            self.publish_collection(key.host_id, alerts);
        }
    }

    fn publish_collection(&self, host_id: HostId, alerts: u32) {
        let hostname = self
            .hosts
            .get(&host_id)
            .map(|host| host.hostname.clone())
            .unwrap_or_default();

        info!(host_id, %hostname, alerts, "log collection finished");

        let event = CollectionCompleted {
            host_id,
            hostname,
            alerts,
            timestamp: Utc::now(),
        };

        // It's OK if there are no subscribers.
        match self.collection_tx.send(event) {
            Ok(num_receivers) => trace!("published collection event to {num_receivers} receivers"),
            Err(_) => trace!("no receivers for collection event"),
        }
    }

    fn paint(&mut self, key: ActionKey, view: ActionView) {
        let result = self.renderer.host_action(key.host_id, key.kind, view);
        self.render_errors.check(result);
    }
}

/// Handle for controlling an OrchestratorActor
///
/// Cheap to clone and share across tasks.
#[derive(Clone)]
pub struct OrchestratorHandle {
    /// Command sender
    sender: mpsc::Sender<OrchestratorCommand>,

    /// Sender kept for handing out new subscriptions
    collection_tx: broadcast::Sender<CollectionCompleted>,
}

impl OrchestratorHandle {
    /// Spawn a new orchestrator
    pub fn spawn(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
        revert_delay: Duration,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (collection_tx, _) = broadcast::channel(64);

        let actor = OrchestratorActor::new(
            gateway,
            renderer,
            cmd_rx,
            collection_tx.clone(),
            revert_delay,
        );

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            collection_tx,
        }
    }

    /// Subscribe to successful log collections
    pub fn subscribe_collections(&self) -> broadcast::Receiver<CollectionCompleted> {
        self.collection_tx.subscribe()
    }

    pub async fn attach(&self, host: Host) -> Result<()> {
        self.sender
            .send(OrchestratorCommand::Attach { host })
            .await
            .context("failed to send Attach command")
    }

    pub async fn detach(&self, host_id: HostId) -> Result<()> {
        self.sender
            .send(OrchestratorCommand::Detach { host_id })
            .await
            .context("failed to send Detach command")
    }

    /// Detach every host, returning how many were attached
    pub async fn detach_all(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorCommand::DetachAll { respond_to: tx })
            .await
            .context("failed to send DetachAll command")?;

        rx.await.context("failed to receive response")
    }

    pub async fn trigger(&self, host_id: HostId, kind: ActionKind) -> Result<TriggerOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorCommand::Trigger {
                host_id,
                kind,
                respond_to: tx,
            })
            .await
            .context("failed to send Trigger command")?;

        rx.await.context("failed to receive response")
    }

    /// Current phase of a host action, `None` if the host is not attached
    pub async fn phase(&self, host_id: HostId, kind: ActionKind) -> Result<Option<Phase>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorCommand::GetPhase {
                host_id,
                kind,
                respond_to: tx,
            })
            .await
            .context("failed to send GetPhase command")?;

        rx.await.context("failed to receive response")
    }

    /// Gracefully shut down the orchestrator
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(OrchestratorCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")
    }
}
