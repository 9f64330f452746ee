use serde::{Deserialize, Serialize};

use crate::{Mount, Resource, StringMap, UserInfo};

/// Simplified single-container workload descriptor.
///
/// This is the shape clients submit on create and receive back from the info
/// endpoint. It is built per request and never stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPod {
    /// Command to run. Must be non-empty before the descriptor is lowered.
    #[serde(default)]
    pub cmd: Vec<String>,
    /// Container name; assigned by the server.
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub env: StringMap,
    #[serde(rename = "limit", default, skip_serializing_if = "Option::is_none")]
    pub resource_limits: Option<Resource>,
    #[serde(rename = "resource", default, skip_serializing_if = "Option::is_none")]
    pub resource_requests: Option<Resource>,
    #[serde(rename = "userinfo", default)]
    pub user_info: UserInfo,
    #[serde(rename = "readonlyfs", default, skip_serializing_if = "is_false")]
    pub read_only_fs: bool,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(rename = "imageversion", default, skip_serializing_if = "String::is_empty")]
    pub image_version: String,
    /// Generated-name prefix of the pod.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub annotations: StringMap,
    #[serde(default, skip_serializing_if = "StringMap::is_empty")]
    pub labels: StringMap,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl WorkerPod {
    /// Container image reference: `image:version`.
    ///
    /// The colon is always present, so an empty version yields a trailing colon.
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.image_version)
    }

    /// Set `image` and `image_version` from a reference, splitting on the first colon.
    pub fn set_image_ref(&mut self, reference: &str) {
        match reference.split_once(':') {
            Some((image, version)) => {
                self.image = image.to_string();
                self.image_version = version.to_string();
            }
            None => {
                self.image = reference.to_string();
                self.image_version.clear();
            }
        }
    }

    pub fn has_cmd(&self) -> bool {
        !self.cmd.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ref_keeps_trailing_colon() {
        let mut wp = WorkerPod {
            image: "busybox".into(),
            ..Default::default()
        };
        assert_eq!(wp.image_ref(), "busybox:");

        wp.image_version = "1.36".into();
        assert_eq!(wp.image_ref(), "busybox:1.36");
    }

    #[test]
    fn set_image_ref_splits_on_first_colon() {
        let mut wp = WorkerPod::default();
        wp.set_image_ref("registry:5000/app:v1");
        assert_eq!(wp.image, "registry");
        assert_eq!(wp.image_version, "5000/app:v1");

        wp.set_image_ref("alpine");
        assert_eq!(wp.image, "alpine");
        assert_eq!(wp.image_version, "");
    }

    #[test]
    fn serde_uses_wire_names() {
        let mut wp = WorkerPod {
            cmd: vec!["echo".into(), "hi".into()],
            name: "worker-abc".into(),
            namespace: "worker".into(),
            read_only_fs: true,
            resource_limits: Some(Resource::new("1", "1Gi")),
            ..Default::default()
        };
        wp.env.insert("A".into(), "1".into());

        let json = serde_json::to_value(&wp).unwrap();
        assert_eq!(json["cmd"][1], "hi");
        assert_eq!(json["namespace"], "worker");
        assert_eq!(json["readonlyfs"], true);
        assert_eq!(json["limit"]["cpu"], "1");
        assert_eq!(json["env"]["A"], "1");
        assert!(json.get("name").is_none());
        assert!(json.get("resource").is_none());
        assert!(json["userinfo"]["uid"].is_null());
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let wp: WorkerPod = serde_json::from_str(r#"{"cmd":["true"]}"#).unwrap();
        assert_eq!(wp.cmd, vec!["true"]);
        assert!(wp.resource_limits.is_none());
        assert!(!wp.read_only_fs);
        assert!(wp.mounts.is_empty());
    }
}
