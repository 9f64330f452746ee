use async_trait::async_trait;
use kservice_model::{Logs, WorkerDetails, WorkerPod, WorkerStatus};

use crate::{context::RequestContext, error::ApiError};

/// Worker operations served over HTTP.
///
/// `PodApiAdapter` is the stock implementation backed by a `PodClient`; custom
/// handlers can wrap it to add behaviour around the four operations.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Decode a descriptor from `body` and create the worker.
    async fn create_worker(
        &self,
        ctx: &RequestContext,
        body: &[u8],
    ) -> Result<WorkerDetails, ApiError>;

    /// Derived status of worker `key`.
    async fn worker_status(&self, ctx: &RequestContext, key: &str)
    -> Result<WorkerStatus, ApiError>;

    /// Log text of worker `key`.
    async fn worker_logs(&self, ctx: &RequestContext, key: &str) -> Result<Logs, ApiError>;

    /// Descriptor recovered from worker `key`'s manifest.
    async fn worker_info(&self, ctx: &RequestContext, key: &str) -> Result<WorkerPod, ApiError>;
}
