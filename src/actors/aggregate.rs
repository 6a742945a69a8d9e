//! AggregateActor - Keeps the alert table and offender chart current
//!
//! The offender chart is drawn once when the actor starts. The alert table
//! is refreshed on demand and after every successful log collection.
//!
//! ## Sequence Gating
//!
//! Refreshes may overlap. Every refresh gets the next sequence number and
//! only a result carrying the latest issued number is painted:
//!
//! ```text
//! issue #1 ───────────────────────────▶ result #1 (dropped, #2 was issued)
//!      issue #2 ─────────▶ result #2 (painted)
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, instrument, trace, warn};

use crate::gateway::{GatewayResult, RemoteGateway};
use crate::types::{AlertRecord, TopOffenderStat};
use crate::view::{AlertTable, OffenderBar, RenderErrorLog, Renderer};

use super::messages::{AggregateCommand, AggregateStats, CollectionCompleted};

/// Reports from spawned fetches back to the actor
#[derive(Debug)]
enum FetchEvent {
    Alerts {
        seq: u64,
        result: GatewayResult<Vec<AlertRecord>>,
    },
    Offenders {
        result: GatewayResult<Vec<TopOffenderStat>>,
    },
}

/// Actor refreshing the aggregate views
pub struct AggregateActor {
    /// Remote API
    gateway: Arc<dyn RemoteGateway>,

    /// Presentation surface
    renderer: Arc<dyn Renderer>,

    /// Command receiver
    command_rx: mpsc::Receiver<AggregateCommand>,

    /// Collection events from the orchestrator
    collection_rx: broadcast::Receiver<CollectionCompleted>,

    /// Whether the orchestrator is still publishing
    collections_open: bool,

    /// Sender handed to spawned fetches
    fetch_tx: mpsc::UnboundedSender<FetchEvent>,

    /// Results of spawned fetches
    fetch_rx: mpsc::UnboundedReceiver<FetchEvent>,

    stats: AggregateStats,

    render_errors: RenderErrorLog,
}

impl AggregateActor {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
        command_rx: mpsc::Receiver<AggregateCommand>,
        collection_rx: broadcast::Receiver<CollectionCompleted>,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();

        Self {
            gateway,
            renderer,
            command_rx,
            collection_rx,
            collections_open: true,
            fetch_tx,
            fetch_rx,
            stats: AggregateStats::default(),
            render_errors: RenderErrorLog::new(),
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting aggregate refresh pipeline");

        self.refresh_top_offenders();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(AggregateCommand::RefreshAlerts { respond_to }) => {
                            let seq = self.refresh_alerts();
                            let _ = respond_to.send(seq);
                        }

                        Some(AggregateCommand::GetStats { respond_to }) => {
                            let _ = respond_to.send(self.stats.clone());
                        }

                        Some(AggregateCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                result = self.collection_rx.recv(), if self.collections_open => {
                    match result {
                        Ok(event) => {
                            debug!(host_id = event.host_id, alerts = event.alerts, "collection completed, refreshing alerts");
                            self.refresh_alerts();
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("pipeline lagged, skipped {skipped} collection events");
                            self.refresh_alerts();
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            trace!("collection channel closed");
                            self.collections_open = false;
                        }
                    }
                }

                Some(event) = self.fetch_rx.recv() => {
                    self.handle_fetch(event);
                }
            }
        }

        debug!("aggregate refresh pipeline stopped");
    }

    /// Issue a new alert refresh and return its sequence number
    fn refresh_alerts(&mut self) -> u64 {
        self.stats.issued += 1;
        let seq = self.stats.issued;

        let gateway = self.gateway.clone();
        let fetch_tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = gateway.list_alerts().await;
            let _ = fetch_tx.send(FetchEvent::Alerts { seq, result });
        });

        trace!(seq, "issued alert refresh");
        seq
    }

    fn refresh_top_offenders(&mut self) {
        let gateway = self.gateway.clone();
        let fetch_tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = gateway.list_top_offenders().await;
            let _ = fetch_tx.send(FetchEvent::Offenders { result });
        });
    }

    fn handle_fetch(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Alerts { seq, result } => {
                if seq != self.stats.issued {
                    debug!(seq, latest = self.stats.issued, "discarding superseded alert refresh");
                    self.stats.discarded += 1;
                    return;
                }

                match result {
                    Ok(alerts) => {
                        trace!(seq, count = alerts.len(), "painting alert table");
                        let rendered = self.renderer.alert_table(AlertTable::from_records(&alerts));
                        self.render_errors.check(rendered);
                        self.stats.rendered = Some(seq);
                    }
                    Err(e) => {
                        error!("failed to refresh alerts: {e}");
                        self.stats.failures += 1;
                    }
                }
            }

            FetchEvent::Offenders { result } => match result {
                Ok(stats) => {
                    let bars = stats.iter().map(OffenderBar::from).collect();
                    let rendered = self.renderer.offender_chart(bars);
                    self.render_errors.check(rendered);
                    self.stats.offenders_rendered = true;
                }
                Err(e) => {
                    error!("failed to load offender chart: {e}");
                    self.stats.failures += 1;
                }
            },
        }
    }
}

/// Handle for controlling an AggregateActor
#[derive(Clone)]
pub struct AggregateHandle {
    sender: mpsc::Sender<AggregateCommand>,
}

impl AggregateHandle {
    /// Spawn the pipeline; the offender chart is requested immediately
    pub fn spawn(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
        collection_rx: broadcast::Receiver<CollectionCompleted>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = AggregateActor::new(gateway, renderer, cmd_rx, collection_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Start an alert table refresh, returning its sequence number
    pub async fn refresh_alerts(&self) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(AggregateCommand::RefreshAlerts { respond_to: tx })
            .await
            .context("failed to send RefreshAlerts command")?;

        rx.await.context("failed to receive response")
    }

    pub async fn stats(&self) -> Result<AggregateStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(AggregateCommand::GetStats { respond_to: tx })
            .await
            .context("failed to send GetStats command")?;

        rx.await.context("failed to receive response")
    }

    /// Gracefully shut down the pipeline
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(AggregateCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")
    }
}
