use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use k8s_openapi::{
    api::core::v1::{
        Container, EnvVar, NFSVolumeSource, Pod, PodSecurityContext, PodSpec,
        ResourceRequirements, SecretVolumeSource, SecurityContext, Volume, VolumeMount,
    },
    apimachinery::pkg::{api::resource::Quantity as KubeQuantity, apis::meta::v1::ObjectMeta},
};
use kservice_model::{ENV_USER, Mount, Resource, StringMap, WorkerPod};
use tracing::{error, trace};

use crate::{config::ResourceDefaults, error::MapError};

pub const RESTART_POLICY: &str = "Never";
pub const IMAGE_PULL_POLICY: &str = "Always";
pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";

/// Build the orchestrator manifest for a descriptor.
///
/// Requests and limits fall back to `defaults` when the descriptor leaves them unset.
/// The first unparseable quantity aborts the translation.
pub fn lower_to_manifest(wp: &WorkerPod, defaults: &ResourceDefaults) -> Result<Pod, MapError> {
    if !wp.has_cmd() {
        return Err(MapError::MissingCommand);
    }

    let (volume_mounts, volumes) = lower_mounts(&wp.mounts, volume_name_seed());
    let container = lower_container(wp, volume_mounts, defaults)?;

    let mut security = PodSecurityContext::default();
    if let Some(uid) = wp.user_info.user_id {
        security.run_as_user = Some(uid);
        security.supplemental_groups = wp.user_info.group_ids.clone();
    }

    trace!(
        container = %container.name,
        namespace = %wp.namespace,
        volumes = volumes.len(),
        "lowered worker descriptor"
    );

    Ok(Pod {
        metadata: ObjectMeta {
            generate_name: non_empty_string(&wp.prefix),
            namespace: Some(wp.namespace.clone()),
            labels: non_empty_map(&wp.labels),
            annotations: non_empty_map(&wp.annotations),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![container],
            host_network: Some(false),
            restart_policy: Some(RESTART_POLICY.to_string()),
            security_context: Some(security),
            volumes: (!volumes.is_empty()).then_some(volumes),
            ..Default::default()
        }),
        status: None,
    })
}

fn lower_container(
    wp: &WorkerPod,
    volume_mounts: Vec<VolumeMount>,
    defaults: &ResourceDefaults,
) -> Result<Container, MapError> {
    let limits = lower_resource(wp.resource_limits.as_ref().unwrap_or(&defaults.limits))?;
    let requests = lower_resource(wp.resource_requests.as_ref().unwrap_or(&defaults.requests))?;

    let mut env: Vec<EnvVar> = wp
        .env
        .iter()
        .map(|(name, value)| env_var(name, value))
        .collect();
    // Appended rather than merged: a caller-supplied USER stays alongside this one.
    if wp.user_info.user_id.is_some() {
        env.push(env_var(ENV_USER, &wp.user_info.username));
    }

    Ok(Container {
        name: wp.name.clone(),
        command: Some(wp.cmd.clone()),
        image: Some(wp.image_ref()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        env: (!env.is_empty()).then_some(env),
        resources: Some(ResourceRequirements {
            limits: (!limits.is_empty()).then_some(limits),
            requests: (!requests.is_empty()).then_some(requests),
            ..Default::default()
        }),
        security_context: Some(SecurityContext {
            read_only_root_filesystem: Some(wp.read_only_fs),
            ..Default::default()
        }),
        volume_mounts: (!volume_mounts.is_empty()).then_some(volume_mounts),
        ..Default::default()
    })
}

fn lower_resource(res: &Resource) -> Result<BTreeMap<String, KubeQuantity>, MapError> {
    let mut out = BTreeMap::new();

    let cpu = res.cpu_quantity().inspect_err(|e| {
        error!(cpu = %res.cpu, error = %e, "failed to parse cpu quantity");
    })?;
    if let Some(cpu) = cpu {
        out.insert(RESOURCE_CPU.to_string(), KubeQuantity(cpu.to_string()));
    }

    let memory = res.memory_quantity().inspect_err(|e| {
        error!(memory = %res.memory, error = %e, "failed to parse memory quantity");
    })?;
    if let Some(memory) = memory {
        out.insert(RESOURCE_MEMORY.to_string(), KubeQuantity(memory.to_string()));
    }

    Ok(out)
}

/// One volume and one volume mount per descriptor mount, named `seed + index`.
fn lower_mounts(mounts: &[Mount], seed: u128) -> (Vec<VolumeMount>, Vec<Volume>) {
    mounts
        .iter()
        .enumerate()
        .map(|(idx, mount)| {
            let name = (seed + idx as u128).to_string();
            let volume = if mount.is_nfs() {
                Volume {
                    name: name.clone(),
                    nfs: Some(NFSVolumeSource {
                        server: mount.server.clone(),
                        path: mount.share.clone(),
                        read_only: None,
                    }),
                    ..Default::default()
                }
            } else {
                Volume {
                    name: name.clone(),
                    secret: Some(SecretVolumeSource {
                        secret_name: Some(mount.share.clone()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }
            };
            let volume_mount = VolumeMount {
                name,
                mount_path: mount.mount_path.clone(),
                ..Default::default()
            };
            (volume_mount, volume)
        })
        .unzip()
}

fn volume_name_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn non_empty_string(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn non_empty_map(map: &StringMap) -> Option<StringMap> {
    (!map.is_empty()).then(|| map.clone())
}
