//! Remote gateway
//!
//! Typed asynchronous wrappers around the remote monitoring API. The
//! gateway owns no client state: every call is a plain request/response
//! and callers "cancel" a call simply by dropping its result.

pub mod error;
mod http;

use async_trait::async_trait;

use crate::types::{AlertRecord, CollectionResult, Host, HostId, OsKind, ProbeResult, TopOffenderStat};

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;

/// Operations offered by the remote API
///
/// Implemented by [`HttpGateway`] in production and by scripted fakes in
/// tests. Implementations must be cheap to share between tasks.
#[async_trait]
pub trait RemoteGateway: Send + Sync + 'static {
    /// List the managed host roster
    async fn list_hosts(&self) -> GatewayResult<Vec<Host>>;

    /// Run an on-demand health probe against a host
    async fn probe_host(&self, host_id: HostId, os_kind: OsKind) -> GatewayResult<ProbeResult>;

    /// Collect and analyze a host's logs
    async fn trigger_collection(&self, host_id: HostId) -> GatewayResult<CollectionResult>;

    /// Current alert snapshot, newest first
    async fn list_alerts(&self) -> GatewayResult<Vec<AlertRecord>>;

    /// Incident counts per offending source address
    async fn list_top_offenders(&self) -> GatewayResult<Vec<TopOffenderStat>>;
}
