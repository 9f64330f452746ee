use std::fmt;

use kservice_core::MapError;
use kservice_model::{Mount, Resource, StringMap, UserInfo, WorkerPod};
use serde::Deserialize;

use crate::error::ApiError;

/// Create request body.
///
/// Every field is optional on the wire so the request can be laid over a
/// server-seeded descriptor; only the fields actually sent replace the seed.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWorkerRequest {
    pub cmd: Option<Vec<String>>,
    pub mounts: Option<Vec<Mount>>,
    pub env: Option<StringMap>,
    #[serde(rename = "limit")]
    pub resource_limits: Option<Resource>,
    #[serde(rename = "resource")]
    pub resource_requests: Option<Resource>,
    #[serde(rename = "userinfo")]
    pub user_info: Option<UserInfo>,
    #[serde(rename = "readonlyfs")]
    pub read_only_fs: Option<bool>,
    pub namespace: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "imageversion")]
    pub image_version: Option<String>,
    pub prefix: Option<String>,
    pub annotations: Option<StringMap>,
    pub labels: Option<StringMap>,
}

impl CreateWorkerRequest {
    /// Parse a raw create body.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.is_empty() {
            return Err(ApiError::Validation(
                "No POST parameters found in the request".to_string(),
            ));
        }
        serde_json::from_slice(body).map_err(invalid_params)
    }

    /// Lay the request over `seed` and finish the generated-name prefix with `suffix`.
    ///
    /// A missing or empty `cmd` is rejected.
    pub fn into_worker_pod(self, mut seed: WorkerPod, suffix: &str) -> Result<WorkerPod, ApiError> {
        match self.cmd {
            Some(cmd) if !cmd.is_empty() => seed.cmd = cmd,
            _ => return Err(invalid_params(MapError::MissingCommand)),
        }

        if let Some(mounts) = self.mounts {
            seed.mounts = mounts;
        }
        if let Some(env) = self.env {
            seed.env = env;
        }
        if self.resource_limits.is_some() {
            seed.resource_limits = self.resource_limits;
        }
        if self.resource_requests.is_some() {
            seed.resource_requests = self.resource_requests;
        }
        if let Some(user_info) = self.user_info {
            seed.user_info = user_info;
        }
        if let Some(read_only_fs) = self.read_only_fs {
            seed.read_only_fs = read_only_fs;
        }
        if let Some(namespace) = self.namespace {
            seed.namespace = namespace;
        }
        if let Some(image) = self.image {
            seed.image = image;
        }
        if let Some(image_version) = self.image_version {
            seed.image_version = image_version;
        }
        if let Some(prefix) = self.prefix {
            seed.prefix = prefix;
        }
        if let Some(annotations) = self.annotations {
            seed.annotations = annotations;
        }
        if let Some(labels) = self.labels {
            seed.labels = labels;
        }

        seed.prefix = format!("{}-{}-", seed.prefix, suffix);
        Ok(seed)
    }
}

/// Create-body rejection; the message wraps the underlying cause.
pub(crate) fn invalid_params(cause: impl fmt::Display) -> ApiError {
    ApiError::Validation(format!("Fail to parse JSON POST params because of {cause}"))
}
