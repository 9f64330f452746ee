use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client, Config,
    api::{LogParams, PostParams},
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::{debug, info, warn};

use super::PodClient;
use crate::{config::ServiceConfig, error::ClientError};

/// [`PodClient`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubePodClient {
    client: Client,
}

impl KubePodClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the configured kubeconfig.
    ///
    /// The configured context is used when the kubeconfig defines it, otherwise
    /// the kubeconfig's current context. Without a kubeconfig file the
    /// configuration is inferred (in-cluster service account or `$KUBECONFIG`).
    pub async fn connect(cfg: &ServiceConfig) -> Result<Self, ClientError> {
        let mut config = if cfg.kubeconfig.exists() {
            let path = cfg.kubeconfig.display();
            let kubeconfig = Kubeconfig::read_from(&cfg.kubeconfig).map_err(|e| {
                ClientError::Config(format!("failed to read kubeconfig {path}: {e}"))
            })?;

            let has_context = kubeconfig
                .contexts
                .iter()
                .any(|c| c.name == cfg.kube_context);
            if !has_context {
                warn!(
                    context = %cfg.kube_context,
                    kubeconfig = %path,
                    "context not found, using current context"
                );
            }
            let options = KubeConfigOptions {
                context: has_context.then(|| cfg.kube_context.clone()),
                cluster: None,
                user: None,
            };

            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| ClientError::Config(format!("invalid kubeconfig {path}: {e}")))?
        } else {
            warn!(
                kubeconfig = %cfg.kubeconfig.display(),
                "kubeconfig not found, inferring configuration"
            );
            Config::infer()
                .await
                .map_err(|e| ClientError::Config(format!("failed to infer configuration: {e}")))?
        };
        config.connect_timeout = Some(cfg.request_timeout);
        config.read_timeout = Some(cfg.request_timeout);

        let cluster = config.cluster_url.to_string();
        let client = Client::try_from(config)
            .map_err(|e| ClientError::Config(format!("failed to build client: {e}")))?;

        info!(%cluster, "kubernetes client ready");
        Ok(Self::new(client))
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl PodClient for KubePodClient {
    async fn create_pod(&self, pod: &Pod, namespace: &str) -> Result<Pod, ClientError> {
        debug!(namespace, "creating pod");
        self.pods(namespace)
            .create(&PostParams::default(), pod)
            .await
            .map_err(|e| {
                let name = pod.metadata.generate_name.as_deref().unwrap_or_default();
                from_kube(e, namespace, name)
            })
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClientError> {
        debug!(namespace, name, "fetching pod");
        self.pods(namespace)
            .get(name)
            .await
            .map_err(|e| from_kube(e, namespace, name))
    }

    async fn get_log_string(
        &self,
        namespace: &str,
        name: &str,
        params: &LogParams,
    ) -> Result<String, ClientError> {
        debug!(namespace, name, "fetching pod logs");
        self.pods(namespace)
            .logs(name, params)
            .await
            .map_err(|e| from_kube(e, namespace, name))
    }
}

fn from_kube(err: kube::Error, namespace: &str, name: &str) -> ClientError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => ClientError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(resp) => ClientError::Api {
            code: resp.code,
            message: resp.message,
        },
        other => ClientError::Transport(other.to_string()),
    }
}
