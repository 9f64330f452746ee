use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{MOUNT_TYPE_NFS, MOUNT_TYPE_SECRET};

/// Kind of storage backing a [`Mount`].
///
/// The wire value is a free string; names other than `NFS` and `secret` are
/// kept verbatim and lowered like NFS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountType {
    /// Network filesystem export (`Server` + `Share`).
    Nfs,
    /// Orchestrator secret, named by `Share`.
    Secret,
    Other(String),
}

impl MountType {
    pub fn as_str(&self) -> &str {
        match self {
            MountType::Nfs => MOUNT_TYPE_NFS,
            MountType::Secret => MOUNT_TYPE_SECRET,
            MountType::Other(name) => name,
        }
    }
}

impl From<&str> for MountType {
    fn from(s: &str) -> Self {
        match s {
            MOUNT_TYPE_NFS => MountType::Nfs,
            MOUNT_TYPE_SECRET => MountType::Secret,
            other => MountType::Other(other.to_string()),
        }
    }
}

impl Serialize for MountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MountType::from(raw.as_str()))
    }
}

/// A storage mount inside the worker container.
///
/// Each mount becomes one volume plus one volume mount in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mount {
    #[serde(default)]
    pub name: String,
    /// Missing or unrecognised types are treated as NFS when lowering.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MountType>,
    #[serde(default)]
    pub share: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub mount_path: String,
}

impl Mount {
    /// NFS mount of `server:share` at `mount_path`.
    pub fn nfs(
        server: impl Into<String>,
        share: impl Into<String>,
        mount_path: impl Into<String>,
    ) -> Self {
        Self {
            name: String::new(),
            kind: Some(MountType::Nfs),
            share: share.into(),
            server: server.into(),
            mount_path: mount_path.into(),
        }
    }

    /// Lowered to an NFS volume: every mount except a secret one.
    pub fn is_nfs(&self) -> bool {
        !matches!(self.kind, Some(MountType::Secret))
    }
}
