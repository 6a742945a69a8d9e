//! HTTP implementation of the remote gateway

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{instrument, trace, warn};

use crate::config::Config;
use crate::types::{AlertRecord, CollectionResult, Host, HostId, OsKind, ProbeResult, TopOffenderStat};

use super::{GatewayError, GatewayResult, RemoteGateway};

/// Header carrying the anti-forgery token on state-mutating requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Error body returned by the API on rejected operations
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Gateway talking to the monitoring API over HTTP
pub struct HttpGateway {
    /// HTTP client (reused across requests)
    client: reqwest::Client,

    /// Base URL without trailing slash
    base_url: String,

    /// Anti-forgery token supplied by the hosting page
    csrf_token: Option<String>,

    /// Set once the missing token has been reported
    csrf_warned: AtomicBool,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        csrf_token: Option<String>,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            csrf_token,
            csrf_warned: AtomicBool::new(false),
        })
    }

    pub fn from_config(config: &Config) -> GatewayResult<Self> {
        Self::new(
            config.api_url.clone(),
            config.csrf_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the anti-forgery token to a state-mutating request
    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => request.header(CSRF_HEADER, token),
            None => {
                if !self.csrf_warned.swap(true, Ordering::Relaxed) {
                    warn!("no anti-forgery token configured, state-mutating requests may be rejected");
                }
                request
            }
        }
    }

    /// Fetch a read-only resource; any non-2xx status is a transport failure
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = self.url(path);
        trace!("GET {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::transport(format!("HTTP error: {}", response.status())));
        }

        decode(response).await
    }
}

/// Decode a success body, or turn a failure body into a `Remote` error
async fn decode_or_remote<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();

    if status.is_success() {
        return decode(response).await;
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    Err(GatewayError::remote(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let body = response.text().await?;

    serde_json::from_str(&body)
        .map_err(|e| GatewayError::transport(format!("failed to parse response body: {e}")))
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn list_hosts(&self) -> GatewayResult<Vec<Host>> {
        self.get_json("/api/hosts").await
    }

    #[instrument(skip(self))]
    async fn probe_host(&self, host_id: HostId, os_kind: OsKind) -> GatewayResult<ProbeResult> {
        let url = self.url(&format!("/api/hosts/{host_id}/{}", os_kind.probe_endpoint()));
        trace!("GET {url}");

        let response = self.client.get(&url).send().await?;
        decode_or_remote(response).await
    }

    #[instrument(skip(self))]
    async fn trigger_collection(&self, host_id: HostId) -> GatewayResult<CollectionResult> {
        let url = self.url(&format!("/api/hosts/{host_id}/logs"));
        trace!("POST {url}");

        let response = self.with_csrf(self.client.post(&url)).send().await?;
        decode_or_remote(response).await
    }

    #[instrument(skip(self))]
    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>> {
        self.get_json("/api/alerts").await
    }

    #[instrument(skip(self))]
    async fn list_top_offenders(&self) -> GatewayResult<Vec<TopOffenderStat>> {
        self.get_json("/api/ip-stats/top").await
    }
}
