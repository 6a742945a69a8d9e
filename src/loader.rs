//! Host list loader
//!
//! Fetches the host roster once per activation and attaches one row and one
//! pair of state machines per host. A roster failure is the only blocking
//! failure of the dashboard: it replaces the whole list with an error
//! placeholder and is returned to the caller.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, instrument};

use crate::actors::orchestrator::OrchestratorHandle;
use crate::gateway::RemoteGateway;
use crate::types::Host;
use crate::view::{HostListPlaceholder, RenderErrorLog, Renderer};

pub struct HostListLoader {
    gateway: Arc<dyn RemoteGateway>,
    renderer: Arc<dyn Renderer>,
    orchestrator: OrchestratorHandle,
    render_errors: RenderErrorLog,
}

impl HostListLoader {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Arc<dyn Renderer>,
        orchestrator: OrchestratorHandle,
    ) -> Self {
        Self {
            gateway,
            renderer,
            orchestrator,
            render_errors: RenderErrorLog::new(),
        }
    }

    /// Replace the current roster with a freshly fetched one
    ///
    /// Previously attached hosts are detached first, which cancels their
    /// pending revert timers.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<Vec<Host>> {
        self.orchestrator.detach_all().await?;
        self.render_errors.check(self.renderer.clear_host_list());

        let hosts = match self.gateway.list_hosts().await {
            Ok(hosts) => hosts,
            Err(e) => {
                error!("failed to load host roster: {e}");
                let placeholder = HostListPlaceholder::Failed {
                    message: e.message().to_string(),
                };
                self.render_errors
                    .check(self.renderer.host_list_placeholder(placeholder));

                return Err(anyhow::Error::new(e).context("failed to load host roster"));
            }
        };

        if hosts.is_empty() {
            info!("host roster is empty");
            self.render_errors
                .check(self.renderer.host_list_placeholder(HostListPlaceholder::Empty));
            return Ok(hosts);
        }

        for host in &hosts {
            self.orchestrator
                .attach(host.clone())
                .await
                .with_context(|| format!("failed to attach host {}", host.id))?;
        }

        info!("loaded {} hosts", hosts.len());
        Ok(hosts)
    }
}
