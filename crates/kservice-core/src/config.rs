//! Process configuration, loaded once at startup and read-only afterwards.

use std::{path::PathBuf, time::Duration};

use kservice_model::{Resource, WorkerPod};

use crate::error::ConfigError;

pub const ENV_PORT: &str = "KSERVICE_PORT";
pub const ENV_WORKER_NAMESPACE: &str = "KSERVICE_WORKER_NAMESPACE";
pub const ENV_KUBECONTEXT: &str = "KSERVICE_KUBECONTEXT";
pub const ENV_KUBECONFIG: &str = "KSERVICE_KUBECONFIG";
pub const ENV_POD_NAME_PREFIX: &str = "KSERVICE_POD_NAME_PREFIX";
pub const ENV_CONTAINER_NAME_PREFIX: &str = "KSERVICE_CONTAINER_NAME_PREFIX";

const DEFAULT_PORT: u16 = 80;
const DEFAULT_WORKER_NAMESPACE: &str = "worker";
const DEFAULT_KUBECONTEXT: &str = "default";
const DEFAULT_KUBECONFIG: &str = "/kube/tempconfig";
const DEFAULT_POD_NAME_PREFIX: &str = "worker";
const DEFAULT_CONTAINER_NAME_PREFIX: &str = "worker-";

/// Upper bound for a single orchestrator call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Resource amounts substituted when a descriptor omits requests or limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDefaults {
    pub requests: Resource,
    pub limits: Resource,
}

impl Default for ResourceDefaults {
    fn default() -> Self {
        Self {
            requests: Resource::default_requests(),
            limits: Resource::default_limits(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_port: u16,
    /// Namespace used for create defaults and every lookup.
    pub worker_namespace: String,
    pub kube_context: String,
    /// Kubeconfig credentials path.
    pub kubeconfig: PathBuf,
    pub pod_name_prefix: String,
    pub container_name_prefix: String,
    pub resources: ResourceDefaults,
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_PORT,
            worker_namespace: DEFAULT_WORKER_NAMESPACE.to_string(),
            kube_context: DEFAULT_KUBECONTEXT.to_string(),
            kubeconfig: PathBuf::from(DEFAULT_KUBECONFIG),
            pod_name_prefix: DEFAULT_POD_NAME_PREFIX.to_string(),
            container_name_prefix: DEFAULT_CONTAINER_NAME_PREFIX.to_string(),
            resources: ResourceDefaults::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Load from `KSERVICE_*` environment variables. Unset or empty values keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(port) = get(ENV_PORT) {
            cfg.listen_port = port.parse().map_err(|e| ConfigError::InvalidValue {
                key: ENV_PORT,
                value: port.clone(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(ns) = get(ENV_WORKER_NAMESPACE) {
            cfg.worker_namespace = ns;
        }
        if let Some(ctx) = get(ENV_KUBECONTEXT) {
            cfg.kube_context = ctx;
        }
        if let Some(path) = get(ENV_KUBECONFIG) {
            cfg.kubeconfig = PathBuf::from(path);
        }
        if let Some(prefix) = get(ENV_POD_NAME_PREFIX) {
            cfg.pod_name_prefix = prefix;
        }
        if let Some(prefix) = get(ENV_CONTAINER_NAME_PREFIX) {
            cfg.container_name_prefix = prefix;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: ENV_PORT,
                value: "0".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// `0.0.0.0:<port>`.
    pub fn listen_address(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    /// Descriptor pre-filled with server defaults for one create request.
    ///
    /// `suffix` is the request's short correlation id; it makes the container
    /// name unique per request.
    pub fn seed_worker_pod(&self, suffix: &str) -> WorkerPod {
        WorkerPod {
            name: format!("{}{}", self.container_name_prefix, suffix),
            namespace: self.worker_namespace.clone(),
            prefix: self.pod_name_prefix.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.listen_address(), "0.0.0.0:80");
        assert_eq!(cfg.worker_namespace, "worker");
        assert_eq!(cfg.kube_context, "default");
        assert_eq!(cfg.kubeconfig, PathBuf::from("/kube/tempconfig"));
        assert_eq!(cfg.resources.requests, Resource::new("100m", "300Mi"));
        assert_eq!(cfg.resources.limits, Resource::new("200m", "400Mi"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            (ENV_PORT, "8080"),
            (ENV_WORKER_NAMESPACE, "batch"),
            (ENV_KUBECONFIG, "/etc/kube/config"),
            (ENV_KUBECONTEXT, ""),
        ]))
        .unwrap();

        assert_eq!(cfg.listen_address(), "0.0.0.0:8080");
        assert_eq!(cfg.worker_namespace, "batch");
        assert_eq!(cfg.kubeconfig, PathBuf::from("/etc/kube/config"));
        assert_eq!(cfg.kube_context, "default");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));

        assert!(ServiceConfig::from_lookup(lookup(&[(ENV_PORT, "0")])).is_err());
    }

    #[test]
    fn seed_carries_server_defaults() {
        let cfg = ServiceConfig::default();
        let wp = cfg.seed_worker_pod("1a2b3c4d");
        assert_eq!(wp.name, "worker-1a2b3c4d");
        assert_eq!(wp.namespace, "worker");
        assert_eq!(wp.prefix, "worker");
        assert!(wp.cmd.is_empty());
    }
}
