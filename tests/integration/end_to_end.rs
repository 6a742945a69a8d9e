//! End-to-end tests against a mock host API over HTTP

use std::sync::Arc;
use std::time::Duration;

use hostwatch::gateway::HttpGateway;
use hostwatch::types::ActionKind;
use hostwatch::view::{ActionView, AlertTable, DashboardView, SharedView};
use hostwatch::{Config, Dashboard};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_host_api() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "hostname": "web1", "ip_address": "10.0.0.5", "os_type": "LINUX"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/hosts/1/ssh-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "free_ram_mb": 512,
            "disk_info": "40%",
            "cpu_load": "0.5",
            "uptime_hours": "120"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2024-03-01 12:00:00",
                "host_name": "web1",
                "alert_type": "FAILED_LOGIN",
                "source_ip": "203.0.113.7",
                "message": "Failed password for root",
                "severity": "WARNING"
            }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/ip-stats/top"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ip": "203.0.113.7", "count": 12}
        ])))
        .mount(&mock_server)
        .await;

    mock_server
}

fn config(mock_server: &MockServer) -> Config {
    Config {
        api_url: mock_server.uri(),
        csrf_token: Some("token-123".to_string()),
        revert_delay_ms: 200,
        ..Config::default()
    }
}

/// Poll the view until `check` holds or two seconds pass
async fn wait_for(view: &SharedView, check: impl Fn(&DashboardView) -> bool) -> bool {
    for _ in 0..100 {
        if check(&*view.read()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_dashboard_against_http_api() {
    let mock_server = mock_host_api().await;
    let config = config(&mock_server);
    let gateway = Arc::new(HttpGateway::from_config(&config).unwrap());
    let view = SharedView::new();

    let dashboard = Dashboard::mount(&config, gateway, Arc::new(view.clone())).await;

    assert!(wait_for(&view, |v| v.alerts.is_some() && !v.offenders.is_empty()).await);
    assert_eq!(dashboard.hosts().len(), 1);
    assert_eq!(view.snapshot().alerts.map(|t: AlertTable| t.len()), Some(1));

    dashboard.trigger(1, ActionKind::StatusCheck).await.unwrap();
    assert!(
        wait_for(&view, |v| matches!(
            v.row(1).map(|row| &row.status),
            Some(ActionView::Badges(badges)) if badges[0].value == "512 MB"
        ))
        .await
    );

    dashboard.unmount().await.unwrap();
}

#[tokio::test]
async fn test_collection_sends_csrf_token_and_reverts() {
    let mock_server = mock_host_api().await;

    Mock::given(method("POST"))
        .and(path("/api/hosts/1/logs"))
        .and(header("X-CSRFToken", "token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": 3,
            "message": "Collected 120 log lines",
            "count": 120
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config(&mock_server);
    let gateway = Arc::new(HttpGateway::from_config(&config).unwrap());
    let view = SharedView::new();
    let dashboard = Dashboard::mount(&config, gateway, Arc::new(view.clone())).await;

    dashboard.trigger(1, ActionKind::LogCollection).await.unwrap();
    assert!(
        wait_for(&view, |v| v.row(1).map(|row| &row.collection)
            == Some(&ActionView::collection_count(3)))
        .await
    );
    assert!(wait_for(&view, |v| v.row(1).map(|row| &row.collection) == Some(&ActionView::Neutral)).await);

    dashboard.unmount().await.unwrap();
}

#[tokio::test]
async fn test_collection_remote_error_message() {
    let mock_server = mock_host_api().await;

    Mock::given(method("POST"))
        .and(path("/api/hosts/1/logs"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "ssh timeout"})),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        revert_delay_ms: 60_000,
        ..config(&mock_server)
    };
    let gateway = Arc::new(HttpGateway::from_config(&config).unwrap());
    let view = SharedView::new();
    let dashboard = Dashboard::mount(&config, gateway, Arc::new(view.clone())).await;

    dashboard.trigger(1, ActionKind::LogCollection).await.unwrap();
    assert!(
        wait_for(&view, |v| v.row(1).map(|row| &row.collection)
            == Some(&ActionView::Failed {
                message: "ssh timeout".to_string()
            }))
        .await
    );

    dashboard.unmount().await.unwrap();
}
