use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::{Container, Pod, PodSpec},
    apimachinery::pkg::api::resource::Quantity as KubeQuantity,
};
use kservice_model::{
    ENV_USER, Mount, MountType, Quantity, Resource, StringMap, UserInfo, WorkerPod,
};
use tracing::trace;

use super::{RESOURCE_CPU, RESOURCE_MEMORY};
use crate::error::MapError;

/// Rebuild a descriptor from a manifest read back from the orchestrator.
///
/// Only the first container is considered. Volumes other than NFS are skipped.
/// Quantities come back in canonical form, so `"0.5"` reads as `"500m"`.
pub fn raise_to_descriptor(pod: &Pod) -> Result<WorkerPod, MapError> {
    let spec = pod.spec.as_ref().ok_or(MapError::MissingContainer)?;
    let container = spec.containers.first().ok_or(MapError::MissingContainer)?;

    let env = raise_env(container);
    let user_info = raise_user_info(spec, &env);
    let resources = container.resources.as_ref();

    let mut wp = WorkerPod {
        cmd: container.command.clone().unwrap_or_default(),
        name: container.name.clone(),
        mounts: raise_mounts(container, spec),
        env,
        resource_limits: Some(raise_resource(resources.and_then(|r| r.limits.as_ref()))),
        resource_requests: Some(raise_resource(resources.and_then(|r| r.requests.as_ref()))),
        user_info,
        read_only_fs: container
            .security_context
            .as_ref()
            .and_then(|sc| sc.read_only_root_filesystem)
            .unwrap_or(false),
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        prefix: pod.metadata.generate_name.clone().unwrap_or_default(),
        annotations: pod.metadata.annotations.clone().unwrap_or_default(),
        labels: pod.metadata.labels.clone().unwrap_or_default(),
        ..Default::default()
    };
    wp.set_image_ref(container.image.as_deref().unwrap_or_default());

    Ok(wp)
}

/// Last entry wins on duplicate names.
fn raise_env(container: &Container) -> StringMap {
    container
        .env
        .iter()
        .flatten()
        .map(|var| (var.name.clone(), var.value.clone().unwrap_or_default()))
        .collect()
}

fn raise_user_info(spec: &PodSpec, env: &StringMap) -> UserInfo {
    let security = spec.security_context.as_ref();
    UserInfo {
        username: env.get(ENV_USER).cloned().unwrap_or_default(),
        user_id: security.and_then(|sc| sc.run_as_user),
        group_ids: security.and_then(|sc| sc.supplemental_groups.clone()),
    }
}

fn raise_resource(list: Option<&BTreeMap<String, KubeQuantity>>) -> Resource {
    let render = |key: &str| {
        list.and_then(|l| l.get(key))
            .map(|q| canonical(&q.0))
            .unwrap_or_default()
    };
    Resource {
        cpu: render(RESOURCE_CPU),
        memory: render(RESOURCE_MEMORY),
    }
}

fn canonical(raw: &str) -> String {
    Quantity::parse(raw)
        .map(|q| q.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn raise_mounts(container: &Container, spec: &PodSpec) -> Vec<Mount> {
    let volumes = spec.volumes.as_deref().unwrap_or_default();

    container
        .volume_mounts
        .iter()
        .flatten()
        .filter_map(|vm| {
            let volume = volumes.iter().find(|v| v.name == vm.name);
            let Some(nfs) = volume.and_then(|v| v.nfs.as_ref()) else {
                trace!(volume = %vm.name, "skipping non-NFS volume");
                return None;
            };
            Some(Mount {
                name: vm.name.clone(),
                kind: Some(MountType::Nfs),
                share: nfs.path.clone(),
                server: nfs.server.clone(),
                mount_path: vm.mount_path.clone(),
            })
        })
        .collect()
}
