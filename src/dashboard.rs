//! Dashboard lifecycle
//!
//! A [`Dashboard`] is activated when the view is mounted and torn down
//! completely when the operator navigates away. Activation loads the host
//! roster, draws the offender chart and then fills the alert table.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::actors::aggregate::AggregateHandle;
use crate::actors::messages::TriggerOutcome;
use crate::actors::orchestrator::OrchestratorHandle;
use crate::config::Config;
use crate::gateway::RemoteGateway;
use crate::loader::HostListLoader;
use crate::types::{ActionKind, Host, HostId};
use crate::view::Renderer;

pub struct Dashboard {
    orchestrator: OrchestratorHandle,
    aggregate: AggregateHandle,
    loader: HostListLoader,
    hosts: Vec<Host>,
}

impl Dashboard {
    /// Activate the dashboard
    ///
    /// A roster failure does not abort activation: it is painted as the
    /// blocking host list placeholder and can be retried with
    /// [`Dashboard::reload_hosts`].
    pub async fn mount(
        config: &Config,
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let orchestrator = OrchestratorHandle::spawn(
            gateway.clone(),
            renderer.clone(),
            Duration::from_millis(config.revert_delay_ms),
        );
        let mut loader = HostListLoader::new(gateway.clone(), renderer.clone(), orchestrator.clone());

        let hosts = match loader.load().await {
            Ok(hosts) => hosts,
            Err(e) => {
                warn!("dashboard mounted without hosts: {e:#}");
                Vec::new()
            }
        };

        let aggregate =
            AggregateHandle::spawn(gateway, renderer, orchestrator.subscribe_collections());

        if let Err(e) = aggregate.refresh_alerts().await {
            warn!("initial alert refresh not started: {e:#}");
        }

        debug!("dashboard mounted with {} hosts", hosts.len());

        Self {
            orchestrator,
            aggregate,
            loader,
            hosts,
        }
    }

    /// Hosts currently attached
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Fetch the roster again and rebuild every host row
    pub async fn reload_hosts(&mut self) -> Result<&[Host]> {
        self.hosts.clear();
        self.hosts = self.loader.load().await?;
        Ok(&self.hosts)
    }

    /// Operator trigger of a host action
    pub async fn trigger(&self, host_id: HostId, kind: ActionKind) -> Result<TriggerOutcome> {
        self.orchestrator.trigger(host_id, kind).await
    }

    /// Operator-initiated alert table refresh
    pub async fn refresh_alerts(&self) -> Result<u64> {
        self.aggregate.refresh_alerts().await
    }

    pub fn orchestrator(&self) -> &OrchestratorHandle {
        &self.orchestrator
    }

    pub fn aggregate(&self) -> &AggregateHandle {
        &self.aggregate
    }

    /// Tear the dashboard down
    ///
    /// Every host is detached (cancelling pending revert timers) and both
    /// actors are stopped.
    pub async fn unmount(self) -> Result<()> {
        let detached = self.orchestrator.detach_all().await?;
        self.orchestrator.shutdown().await?;
        self.aggregate.shutdown().await?;

        debug!("dashboard unmounted, {detached} hosts detached");
        Ok(())
    }
}
