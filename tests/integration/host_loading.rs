//! Integration tests for roster loading and dashboard activation

use std::sync::Arc;

use hostwatch::actors::orchestrator::OrchestratorHandle;
use hostwatch::gateway::GatewayError;
use hostwatch::loader::HostListLoader;
use hostwatch::types::{ActionKind, OsKind};
use hostwatch::view::{HostListPlaceholder, HostRow, NO_HOSTS};
use hostwatch::{Config, Dashboard};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test(start_paused = true)]
async fn test_roster_mounts_one_row_per_host() {
    let roster = vec![
        host(1, "web1", OsKind::Linux),
        host(2, "dc1", OsKind::Windows),
    ];
    let gateway = Arc::new(FakeGateway::with_hosts(roster.clone()));
    let renderer = Arc::new(RecordingRenderer::new());

    let dashboard = Dashboard::mount(&Config::default(), gateway.clone(), renderer.clone()).await;
    settle().await;

    assert_eq!(dashboard.hosts(), roster.as_slice());

    let snapshot = renderer.snapshot();
    assert_eq!(snapshot.host_placeholder, None);
    assert_eq!(
        snapshot.hosts,
        roster.iter().cloned().map(HostRow::new).collect::<Vec<_>>()
    );

    for kind in ActionKind::ALL {
        assert!(dashboard.orchestrator().phase(2, kind).await.unwrap().is_some());
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_roster_renders_single_placeholder() {
    let gateway = Arc::new(FakeGateway::with_hosts(Vec::new()));
    let renderer = Arc::new(RecordingRenderer::new());

    let dashboard = Dashboard::mount(&Config::default(), gateway.clone(), renderer.clone()).await;
    settle().await;

    let placeholders: Vec<_> = renderer
        .calls()
        .into_iter()
        .filter(|call| matches!(call, RenderCall::Placeholder(_) | RenderCall::Mount(_)))
        .collect();
    assert_eq!(
        placeholders,
        vec![RenderCall::Placeholder(HostListPlaceholder::Empty)]
    );

    let snapshot = renderer.snapshot();
    assert!(snapshot.hosts.is_empty());
    assert_eq!(
        snapshot.host_placeholder.map(|p| p.text()),
        Some(NO_HOSTS.to_string())
    );

    // no state machines exist
    assert_eq!(dashboard.orchestrator().phase(1, ActionKind::StatusCheck).await.unwrap(), None);
    assert_eq!(dashboard.orchestrator().detach_all().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_roster_failure_blocks_host_list() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.set_hosts(Err(remote_error("database unavailable")));
    let renderer = Arc::new(RecordingRenderer::new());

    let mut dashboard =
        Dashboard::mount(&Config::default(), gateway.clone(), renderer.clone()).await;
    settle().await;

    assert!(dashboard.hosts().is_empty());
    let placeholder = renderer.snapshot().host_placeholder.unwrap();
    assert_eq!(placeholder.text(), "Host API error: database unavailable");

    // the rest of the dashboard still activates
    assert_eq!(gateway.offender_calls(), 1);
    assert_eq!(gateway.alert_calls(), 1);

    let err = dashboard.reload_hosts().await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<GatewayError>(),
        Some(&remote_error("database unavailable"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_reload_replaces_roster() {
    let gateway = Arc::new(FakeGateway::with_hosts(vec![
        host(1, "web1", OsKind::Linux),
        host(2, "web2", OsKind::Linux),
    ]));
    let renderer = Arc::new(RecordingRenderer::new());
    let mut dashboard =
        Dashboard::mount(&Config::default(), gateway.clone(), renderer.clone()).await;
    settle().await;

    gateway.set_hosts(Ok(vec![host(3, "db1", OsKind::Linux)]));
    let hosts = dashboard.reload_hosts().await.unwrap().to_vec();
    settle().await;

    assert_eq!(hosts, vec![host(3, "db1", OsKind::Linux)]);
    assert_eq!(gateway.host_calls(), 2);

    let snapshot = renderer.snapshot();
    assert_eq!(snapshot.hosts, vec![HostRow::new(host(3, "db1", OsKind::Linux))]);

    let orchestrator = dashboard.orchestrator();
    assert_eq!(orchestrator.phase(1, ActionKind::StatusCheck).await.unwrap(), None);
    assert!(orchestrator.phase(3, ActionKind::StatusCheck).await.unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_activation_order() {
    let gateway = Arc::new(FakeGateway::with_hosts(vec![host(1, "web1", OsKind::Linux)]));
    let renderer = Arc::new(RecordingRenderer::new());

    let _dashboard = Dashboard::mount(&Config::default(), gateway.clone(), renderer.clone()).await;
    settle().await;

    let calls = renderer.calls();
    let position = |wanted: fn(&RenderCall) -> bool| calls.iter().position(wanted);

    let mounted = position(|call| matches!(call, RenderCall::Mount(1))).unwrap();
    let chart = position(|call| matches!(call, RenderCall::OffenderChart(_))).unwrap();
    let table = position(|call| matches!(call, RenderCall::AlertTable(_))).unwrap();

    assert_eq!(calls[0], RenderCall::ClearHostList);
    assert!(mounted < chart);
    assert!(mounted < table);
}

#[tokio::test(start_paused = true)]
async fn test_loader_detaches_previous_hosts() {
    let gateway = Arc::new(FakeGateway::with_hosts(vec![host(1, "web1", OsKind::Linux)]));
    let renderer = Arc::new(RecordingRenderer::new());
    let orchestrator = OrchestratorHandle::spawn(
        gateway.clone(),
        renderer.clone(),
        std::time::Duration::from_secs(3),
    );
    let mut loader = HostListLoader::new(gateway.clone(), renderer.clone(), orchestrator.clone());

    loader.load().await.unwrap();
    renderer.reset_calls();
    loader.load().await.unwrap();
    settle().await;

    assert_eq!(
        renderer.calls_for(1),
        vec![RenderCall::Unmount(1), RenderCall::Mount(1)]
    );
    assert_eq!(renderer.snapshot().hosts.len(), 1);
}
