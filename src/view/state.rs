//! In-memory presentation surface
//!
//! [`DashboardView`] is the node tree the terminal front end draws from.
//! [`SharedView`] is the [`Renderer`] the core writes into.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::types::{ActionKind, Host, HostId};

use super::{ActionView, AlertTable, HostListPlaceholder, OffenderBar, RenderError, Renderer};

/// Rendered row of a single host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRow {
    pub host: Host,

    /// Status region (probe badges)
    pub status: ActionView,

    /// Log collection affordance
    pub collection: ActionView,
}

impl HostRow {
    /// Freshly mounted row, both actions neutral
    pub fn new(host: Host) -> Self {
        Self {
            host,
            status: ActionView::Neutral,
            collection: ActionView::Neutral,
        }
    }

    pub fn action(&self, kind: ActionKind) -> &ActionView {
        match kind {
            ActionKind::StatusCheck => &self.status,
            ActionKind::LogCollection => &self.collection,
        }
    }

    fn action_mut(&mut self, kind: ActionKind) -> &mut ActionView {
        match kind {
            ActionKind::StatusCheck => &mut self.status,
            ActionKind::LogCollection => &mut self.collection,
        }
    }
}

/// Everything currently painted on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    /// Host rows in mount order
    pub hosts: Vec<HostRow>,

    /// Placeholder replacing the host list (empty roster or load failure)
    pub host_placeholder: Option<HostListPlaceholder>,

    /// Alert table, `None` until the first successful refresh
    pub alerts: Option<AlertTable>,

    /// Offender chart bars
    pub offenders: Vec<OffenderBar>,

    /// Last time anything was painted
    pub last_update: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, host_id: HostId) -> Option<&HostRow> {
        self.hosts.iter().find(|row| row.host.id == host_id)
    }

    fn row_mut(&mut self, host_id: HostId) -> Option<&mut HostRow> {
        self.hosts.iter_mut().find(|row| row.host.id == host_id)
    }

    fn touch(&mut self) {
        self.last_update = Some(Utc::now());
    }
}

/// Thread-safe handle to a [`DashboardView`]
///
/// Cloning yields another handle to the same view.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<RwLock<DashboardView>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view
    pub fn snapshot(&self) -> DashboardView {
        self.read().clone()
    }

    /// Borrow the current view
    pub fn read(&self) -> RwLockReadGuard<'_, DashboardView> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardView> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Renderer for SharedView {
    fn clear_host_list(&self) -> Result<(), RenderError> {
        let mut view = self.write();
        view.hosts.clear();
        view.host_placeholder = None;
        view.touch();
        Ok(())
    }

    fn host_list_placeholder(&self, placeholder: HostListPlaceholder) -> Result<(), RenderError> {
        let mut view = self.write();
        view.hosts.clear();
        view.host_placeholder = Some(placeholder);
        view.touch();
        Ok(())
    }

    fn mount_host_row(&self, host: &Host) -> Result<(), RenderError> {
        let mut view = self.write();
        view.host_placeholder = None;

        match view.row_mut(host.id) {
            Some(row) => *row = HostRow::new(host.clone()),
            None => view.hosts.push(HostRow::new(host.clone())),
        }

        view.touch();
        Ok(())
    }

    fn unmount_host_row(&self, host_id: HostId) -> Result<(), RenderError> {
        let mut view = self.write();
        view.hosts.retain(|row| row.host.id != host_id);
        view.touch();
        Ok(())
    }

    fn host_action(
        &self,
        host_id: HostId,
        kind: ActionKind,
        action: ActionView,
    ) -> Result<(), RenderError> {
        let mut view = self.write();
        let row = view
            .row_mut(host_id)
            .ok_or_else(|| RenderError::missing(format!("host row {host_id}")))?;

        *row.action_mut(kind) = action;
        view.touch();
        Ok(())
    }

    fn alert_table(&self, table: AlertTable) -> Result<(), RenderError> {
        let mut view = self.write();
        view.alerts = Some(table);
        view.touch();
        Ok(())
    }

    fn offender_chart(&self, bars: Vec<OffenderBar>) -> Result<(), RenderError> {
        let mut view = self.write();
        view.offenders = bars;
        view.touch();
        Ok(())
    }
}
