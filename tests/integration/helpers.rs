//! Test helpers shared by the integration tests
//!
//! [`FakeGateway`] serves scripted responses and counts calls; responses can
//! be held back behind a [`Notify`] gate to control completion order.
//! [`RecordingRenderer`] paints into a [`SharedView`] and keeps a log of
//! every call it received.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use hostwatch::gateway::{GatewayError, GatewayResult, RemoteGateway};
use hostwatch::types::{
    ActionKind, AlertRecord, CollectionResult, Host, HostId, OsKind, ProbeResult, Severity,
    TopOffenderStat,
};
use hostwatch::view::{
    ActionView, AlertTable, DashboardView, HostListPlaceholder, OffenderBar, RenderError,
    Renderer, SharedView,
};

/// One scripted response, optionally held back until released
pub struct Scripted<T> {
    result: GatewayResult<T>,
    gate: Option<Arc<Notify>>,
}

impl<T> Scripted<T> {
    pub fn ready(result: GatewayResult<T>) -> Self {
        Self { result, gate: None }
    }

    /// Response that is only delivered after `gate.notify_one()`
    pub fn gated(result: GatewayResult<T>, gate: Arc<Notify>) -> Self {
        Self {
            result,
            gate: Some(gate),
        }
    }

    async fn deliver(self) -> GatewayResult<T> {
        if let Some(gate) = self.gate {
            gate.notified().await;
        }
        self.result
    }
}

/// Queue of scripted responses with a fallback once it runs dry
struct Script<T: Clone> {
    queue: Mutex<VecDeque<Scripted<T>>>,
    fallback: Mutex<GatewayResult<T>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(fallback: GatewayResult<T>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, scripted: Scripted<T>) {
        self.queue.lock().unwrap().push_back(scripted);
    }

    fn set_fallback(&self, result: GatewayResult<T>) {
        *self.fallback.lock().unwrap() = result;
    }

    fn next(&self) -> Scripted<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::ready(self.fallback.lock().unwrap().clone()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Scripted in-memory host API
pub struct FakeGateway {
    hosts: Script<Vec<Host>>,
    probes: Script<ProbeResult>,
    collections: Script<CollectionResult>,
    alerts: Script<Vec<AlertRecord>>,
    offenders: Script<Vec<TopOffenderStat>>,
    probe_calls: Mutex<HashMap<HostId, Vec<OsKind>>>,
    collection_calls: Mutex<Vec<HostId>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            hosts: Script::new(Ok(Vec::new())),
            probes: Script::new(Ok(probe("1024", "10%", "0.1", "1"))),
            collections: Script::new(Ok(collection(0))),
            alerts: Script::new(Ok(Vec::new())),
            offenders: Script::new(Ok(Vec::new())),
            probe_calls: Mutex::new(HashMap::new()),
            collection_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_hosts(hosts: Vec<Host>) -> Self {
        let gateway = Self::new();
        gateway.hosts.set_fallback(Ok(hosts));
        gateway
    }

    pub fn set_hosts(&self, result: GatewayResult<Vec<Host>>) {
        self.hosts.set_fallback(result);
    }

    pub fn push_probe(&self, scripted: Scripted<ProbeResult>) {
        self.probes.push(scripted);
    }

    pub fn push_collection(&self, scripted: Scripted<CollectionResult>) {
        self.collections.push(scripted);
    }

    pub fn push_alerts(&self, scripted: Scripted<Vec<AlertRecord>>) {
        self.alerts.push(scripted);
    }

    pub fn set_alerts(&self, result: GatewayResult<Vec<AlertRecord>>) {
        self.alerts.set_fallback(result);
    }

    pub fn set_offenders(&self, result: GatewayResult<Vec<TopOffenderStat>>) {
        self.offenders.set_fallback(result);
    }

    pub fn host_calls(&self) -> usize {
        self.hosts.calls()
    }

    pub fn probe_calls(&self) -> usize {
        self.probes.calls()
    }

    pub fn probed_os(&self, host_id: HostId) -> Vec<OsKind> {
        self.probe_calls
            .lock()
            .unwrap()
            .get(&host_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn collection_calls(&self) -> usize {
        self.collections.calls()
    }

    pub fn collected_hosts(&self) -> Vec<HostId> {
        self.collection_calls.lock().unwrap().clone()
    }

    pub fn alert_calls(&self) -> usize {
        self.alerts.calls()
    }

    pub fn offender_calls(&self) -> usize {
        self.offenders.calls()
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn list_hosts(&self) -> GatewayResult<Vec<Host>> {
        self.hosts.next().deliver().await
    }

    async fn probe_host(&self, host_id: HostId, os_kind: OsKind) -> GatewayResult<ProbeResult> {
        self.probe_calls
            .lock()
            .unwrap()
            .entry(host_id)
            .or_default()
            .push(os_kind);
        self.probes.next().deliver().await
    }

    async fn trigger_collection(&self, host_id: HostId) -> GatewayResult<CollectionResult> {
        self.collection_calls.lock().unwrap().push(host_id);
        self.collections.next().deliver().await
    }

    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>> {
        self.alerts.next().deliver().await
    }

    async fn list_top_offenders(&self) -> GatewayResult<Vec<TopOffenderStat>> {
        self.offenders.next().deliver().await
    }
}

/// A call received by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    ClearHostList,
    Placeholder(HostListPlaceholder),
    Mount(HostId),
    Unmount(HostId),
    Action(HostId, ActionKind, ActionView),
    AlertTable(AlertTable),
    OffenderChart(Vec<OffenderBar>),
}

/// Renderer painting into a [`SharedView`] while logging every call
#[derive(Default)]
pub struct RecordingRenderer {
    view: SharedView,
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardView {
        self.view.snapshot()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget every call logged so far
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Calls addressing one host row
    pub fn calls_for(&self, host_id: HostId) -> Vec<RenderCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                RenderCall::Mount(id) | RenderCall::Unmount(id) | RenderCall::Action(id, ..) => {
                    *id == host_id
                }
                _ => false,
            })
            .collect()
    }

    pub fn alert_tables(&self) -> Vec<AlertTable> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RenderCall::AlertTable(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn clear_host_list(&self) -> Result<(), RenderError> {
        self.record(RenderCall::ClearHostList);
        self.view.clear_host_list()
    }

    fn host_list_placeholder(&self, placeholder: HostListPlaceholder) -> Result<(), RenderError> {
        self.record(RenderCall::Placeholder(placeholder.clone()));
        self.view.host_list_placeholder(placeholder)
    }

    fn mount_host_row(&self, host: &Host) -> Result<(), RenderError> {
        self.record(RenderCall::Mount(host.id));
        self.view.mount_host_row(host)
    }

    fn unmount_host_row(&self, host_id: HostId) -> Result<(), RenderError> {
        self.record(RenderCall::Unmount(host_id));
        self.view.unmount_host_row(host_id)
    }

    fn host_action(
        &self,
        host_id: HostId,
        kind: ActionKind,
        view: ActionView,
    ) -> Result<(), RenderError> {
        self.record(RenderCall::Action(host_id, kind, view.clone()));
        self.view.host_action(host_id, kind, view)
    }

    fn alert_table(&self, table: AlertTable) -> Result<(), RenderError> {
        self.record(RenderCall::AlertTable(table.clone()));
        self.view.alert_table(table)
    }

    fn offender_chart(&self, bars: Vec<OffenderBar>) -> Result<(), RenderError> {
        self.record(RenderCall::OffenderChart(bars.clone()));
        self.view.offender_chart(bars)
    }
}

pub fn host(id: HostId, hostname: &str, os_kind: OsKind) -> Host {
    Host {
        id,
        hostname: hostname.to_string(),
        ip_address: format!("10.0.0.{id}"),
        os_kind,
    }
}

pub fn probe(free_ram_mb: &str, disk_info: &str, cpu_load: &str, uptime_hours: &str) -> ProbeResult {
    ProbeResult {
        free_ram_mb: free_ram_mb.to_string(),
        disk_info: disk_info.to_string(),
        disk_total: None,
        cpu_load: cpu_load.to_string(),
        uptime_hours: uptime_hours.to_string(),
    }
}

pub fn collection(alerts: u32) -> CollectionResult {
    CollectionResult {
        alerts,
        message: None,
        count: None,
        filename: None,
    }
}

pub fn alert(host_name: &str, alert_type: &str, severity: Severity) -> AlertRecord {
    AlertRecord {
        timestamp: "2024-03-01 12:00:00".to_string(),
        host_name: host_name.to_string(),
        alert_type: alert_type.to_string(),
        source_ip: Some("203.0.113.7".to_string()),
        message: format!("{alert_type} on {host_name}"),
        severity,
    }
}

pub fn remote_error(message: &str) -> GatewayError {
    GatewayError::remote(500, message)
}

/// Let every runnable task finish its current step
///
/// Under a paused clock this returns once the runtime is idle, without
/// advancing past any pending timer of a second or more.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
