//! Orchestrator collaborator seam.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
pub use kube::api::LogParams;

use crate::error::ClientError;

mod kube_client;
pub use kube_client::KubePodClient;

/// Pod operations the service needs from the orchestrator.
///
/// Implementations are shared by all in-flight requests and must be safe for
/// concurrent use. Each method performs exactly one orchestrator call.
#[async_trait]
pub trait PodClient: Send + Sync + 'static {
    /// Submit `pod` to `namespace` and return the stored manifest.
    async fn create_pod(&self, pod: &Pod, namespace: &str) -> Result<Pod, ClientError>;

    /// Fetch a pod by name.
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClientError>;

    /// Fetch a pod's log output as one string.
    async fn get_log_string(
        &self,
        namespace: &str,
        name: &str,
        params: &LogParams,
    ) -> Result<String, ClientError>;
}
