use std::sync::Arc;

use async_trait::async_trait;
use kservice_core::{
    MapError, PodClient, ServiceConfig,
    client::LogParams,
    map::{lower_to_manifest, raise_to_descriptor},
    status::derive_status,
};
use kservice_model::{Logs, WorkerDetails, WorkerPod, WorkerStatus};
use tracing::debug;

use crate::{
    context::RequestContext,
    error::ApiError,
    handler::ApiHandler,
    request::{CreateWorkerRequest, invalid_params},
};

/// `ApiHandler` backed by an orchestrator `PodClient`.
///
/// Holds the read-only service configuration and the shared client handle.
/// Every operation makes at most one collaborator call, raced against the
/// request's cancellation.
pub struct PodApiAdapter<C> {
    config: Arc<ServiceConfig>,
    client: Arc<C>,
}

impl<C> PodApiAdapter<C>
where
    C: PodClient,
{
    pub fn new(config: Arc<ServiceConfig>, client: Arc<C>) -> Self {
        Self { config, client }
    }

    fn namespace(&self) -> &str {
        &self.config.worker_namespace
    }
}

fn cancelled() -> ApiError {
    ApiError::Collaborator("request cancelled before the orchestrator answered".to_string())
}

#[async_trait]
impl<C> ApiHandler for PodApiAdapter<C>
where
    C: PodClient,
{
    async fn create_worker(
        &self,
        ctx: &RequestContext,
        body: &[u8],
    ) -> Result<WorkerDetails, ApiError> {
        let suffix = ctx.short_id();
        let seed = self.config.seed_worker_pod(&suffix);
        let worker = CreateWorkerRequest::from_body(body)?.into_worker_pod(seed, &suffix)?;

        let pod = lower_to_manifest(&worker, &self.config.resources).map_err(|e| match e {
            MapError::MissingCommand => invalid_params(e),
            other => ApiError::Translation(format!("Fail to init Pod object because of {other}")),
        })?;
        debug!(
            request_id = %ctx.id(),
            worker = %worker.name,
            namespace = %worker.namespace,
            "creating pod"
        );

        let created = ctx
            .until_cancelled(self.client.create_pod(&pod, &worker.namespace))
            .await
            .ok_or_else(cancelled)?
            .map_err(|e| ApiError::Collaborator(format!("Fail to create Pod because of {e}")))?;

        Ok(WorkerDetails {
            id: created.metadata.name.unwrap_or_default(),
        })
    }

    async fn worker_status(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<WorkerStatus, ApiError> {
        let pod = ctx
            .until_cancelled(self.client.get_pod(self.namespace(), key))
            .await
            .ok_or_else(cancelled)?
            .map_err(|e| ApiError::NotFound(format!("Fail to get Pod for {key} because of {e}")))?;

        Ok(derive_status(&pod))
    }

    async fn worker_logs(&self, ctx: &RequestContext, key: &str) -> Result<Logs, ApiError> {
        let params = LogParams::default();
        let log = ctx
            .until_cancelled(self.client.get_log_string(self.namespace(), key, &params))
            .await
            .ok_or_else(cancelled)?
            .map_err(|e| {
                ApiError::NotFound(format!("Fail to find log stream for {key} because of {e}"))
            })?;

        Ok(Logs { log })
    }

    async fn worker_info(&self, ctx: &RequestContext, key: &str) -> Result<WorkerPod, ApiError> {
        let pod = ctx
            .until_cancelled(self.client.get_pod(self.namespace(), key))
            .await
            .ok_or_else(cancelled)?
            .map_err(|e| ApiError::NotFound(format!("Fail to get Pod for {key} because of {e}")))?;

        raise_to_descriptor(&pod).map_err(|e| {
            ApiError::Translation(format!("Fail to read Pod {key} because of {e}"))
        })
    }
}
