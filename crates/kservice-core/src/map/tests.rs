use std::collections::BTreeSet;

use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, Volume, VolumeMount};
use kservice_model::{Mount, MountType, Resource, UserInfo, WorkerPod};

use super::*;
use crate::{config::ResourceDefaults, error::MapError};

fn descriptor() -> WorkerPod {
    let mut wp = WorkerPod {
        cmd: vec!["sh".into(), "-c".into(), "echo hello".into()],
        name: "worker-1a2b3c4d".into(),
        namespace: "worker".into(),
        prefix: "worker-1a2b3c4d-".into(),
        image: "busybox".into(),
        image_version: "1.36".into(),
        mounts: vec![
            Mount::nfs("10.0.0.5", "/exports/data", "/data"),
            Mount::nfs("10.0.0.6", "/exports/scratch", "/scratch"),
        ],
        ..Default::default()
    };
    wp.env.insert("MODE".into(), "batch".into());
    wp.env.insert("LEVEL".into(), "3".into());
    wp.labels.insert("team".into(), "infra".into());
    wp.annotations.insert("owner".into(), "ops".into());
    wp
}

fn lower(wp: &WorkerPod) -> k8s_openapi::api::core::v1::Pod {
    lower_to_manifest(wp, &ResourceDefaults::default()).unwrap()
}

fn env_set(wp: &WorkerPod) -> BTreeSet<(String, String)> {
    wp.env.clone().into_iter().collect()
}

fn mount_targets(wp: &WorkerPod) -> Vec<(String, String, String)> {
    wp.mounts
        .iter()
        .map(|m| (m.server.clone(), m.share.clone(), m.mount_path.clone()))
        .collect()
}

#[test]
fn lowering_sets_fixed_pod_fields() {
    let pod = lower(&descriptor());
    let spec = pod.spec.as_ref().unwrap();
    let container = &spec.containers[0];

    assert_eq!(pod.metadata.generate_name.as_deref(), Some("worker-1a2b3c4d-"));
    assert_eq!(pod.metadata.namespace.as_deref(), Some("worker"));
    assert_eq!(pod.metadata.labels.as_ref().unwrap()["team"], "infra");
    assert_eq!(pod.metadata.annotations.as_ref().unwrap()["owner"], "ops");
    assert_eq!(spec.host_network, Some(false));
    assert_eq!(spec.restart_policy.as_deref(), Some(RESTART_POLICY));
    assert_eq!(spec.containers.len(), 1);
    assert_eq!(container.name, "worker-1a2b3c4d");
    assert_eq!(container.image.as_deref(), Some("busybox:1.36"));
    assert_eq!(container.image_pull_policy.as_deref(), Some(IMAGE_PULL_POLICY));
    assert_eq!(
        container
            .security_context
            .as_ref()
            .unwrap()
            .read_only_root_filesystem,
        Some(false)
    );
}

#[test]
fn empty_image_version_keeps_trailing_colon() {
    let wp = WorkerPod {
        image_version: String::new(),
        ..descriptor()
    };
    let pod = lower(&wp);
    assert_eq!(
        pod.spec.unwrap().containers[0].image.as_deref(),
        Some("busybox:")
    );
}

#[test]
fn missing_command_is_rejected() {
    let wp = WorkerPod {
        cmd: Vec::new(),
        ..descriptor()
    };
    let err = lower_to_manifest(&wp, &ResourceDefaults::default()).unwrap_err();
    assert!(matches!(err, MapError::MissingCommand));
}

#[test]
fn unset_resources_use_defaults() {
    let pod = lower(&descriptor());
    let resources = pod.spec.unwrap().containers[0].resources.clone().unwrap();

    let limits = resources.limits.unwrap();
    let requests = resources.requests.unwrap();
    assert_eq!(limits[RESOURCE_CPU].0, "200m");
    assert_eq!(limits[RESOURCE_MEMORY].0, "400Mi");
    assert_eq!(requests[RESOURCE_CPU].0, "100m");
    assert_eq!(requests[RESOURCE_MEMORY].0, "300Mi");
}

#[test]
fn empty_quantity_fields_are_left_unset() {
    let wp = WorkerPod {
        resource_limits: Some(Resource::new("", "1Gi")),
        resource_requests: Some(Resource::default()),
        ..descriptor()
    };
    let pod = lower(&wp);
    let resources = pod.spec.unwrap().containers[0].resources.clone().unwrap();

    let limits = resources.limits.unwrap();
    assert!(!limits.contains_key(RESOURCE_CPU));
    assert_eq!(limits[RESOURCE_MEMORY].0, "1Gi");
    assert!(resources.requests.is_none());
}

#[test]
fn invalid_quantity_aborts_lowering() {
    let wp = WorkerPod {
        resource_requests: Some(Resource::new("two cores", "")),
        ..descriptor()
    };
    let err = lower_to_manifest(&wp, &ResourceDefaults::default()).unwrap_err();
    assert!(matches!(err, MapError::Quantity(_)));
}

#[test]
fn mounts_become_uniquely_named_volume_pairs() {
    let pod = lower(&descriptor());
    let spec = pod.spec.unwrap();
    let volumes = spec.volumes.unwrap();
    let mounts = spec.containers[0].volume_mounts.clone().unwrap();

    assert_eq!(volumes.len(), 2);
    assert_eq!(mounts.len(), 2);
    assert_ne!(volumes[0].name, volumes[1].name);
    for (volume, mount) in volumes.iter().zip(&mounts) {
        assert_eq!(volume.name, mount.name);
        assert!(volume.nfs.is_some());
    }
    assert_eq!(volumes[0].nfs.as_ref().unwrap().server, "10.0.0.5");
    assert_eq!(volumes[0].nfs.as_ref().unwrap().path, "/exports/data");
    assert_eq!(mounts[0].mount_path, "/data");
}

#[test]
fn user_info_sets_security_context_and_appends_user_env() {
    let mut wp = descriptor();
    wp.env.insert("USER".into(), "caller".into());
    wp.user_info = UserInfo::new("alice", 1000, vec![2000, 3000]);

    let pod = lower(&wp);
    let spec = pod.spec.unwrap();
    let security = spec.security_context.unwrap();
    assert_eq!(security.run_as_user, Some(1000));
    assert_eq!(security.supplemental_groups, Some(vec![2000, 3000]));

    let env = spec.containers[0].env.clone().unwrap();
    let users: Vec<_> = env
        .iter()
        .filter(|v| v.name == "USER")
        .map(|v| v.value.clone().unwrap())
        .collect();
    assert_eq!(users, vec!["caller", "alice"]);
    assert_eq!(env.last().unwrap().name, "USER");
}

#[test]
fn no_user_id_leaves_security_context_empty() {
    let mut wp = descriptor();
    wp.user_info.username = "ghost".into();

    let pod = lower(&wp);
    let spec = pod.spec.unwrap();
    let security = spec.security_context.unwrap();
    assert_eq!(security.run_as_user, None);
    assert_eq!(security.supplemental_groups, None);
    assert!(
        spec.containers[0]
            .env
            .iter()
            .flatten()
            .all(|v| v.name != "USER")
    );
}

#[test]
fn round_trip_preserves_core_fields() {
    let mut wp = descriptor();
    wp.user_info = UserInfo::new("alice", 1000, vec![2000]);
    wp.read_only_fs = true;

    let back = raise_to_descriptor(&lower(&wp)).unwrap();

    assert_eq!(back.cmd, wp.cmd);
    assert_eq!(back.namespace, wp.namespace);
    assert_eq!(back.image, "busybox");
    assert_eq!(back.image_version, "1.36");
    assert_eq!(back.labels, wp.labels);
    assert_eq!(back.annotations, wp.annotations);
    assert_eq!(back.user_info, wp.user_info);
    assert!(back.read_only_fs);
    assert_eq!(mount_targets(&back), mount_targets(&wp));
    assert!(back.mounts.iter().all(|m| m.kind == Some(MountType::Nfs)));

    let mut expected_env = env_set(&wp);
    expected_env.insert(("USER".into(), "alice".into()));
    assert_eq!(env_set(&back), expected_env);
}

#[test]
fn unrecognised_mount_types_lower_as_nfs() {
    let mut wp = descriptor();
    wp.mounts = vec![Mount {
        kind: Some(MountType::Other("cifs".into())),
        server: "fs.local".into(),
        share: "/exports/home".into(),
        mount_path: "/home".into(),
        ..Default::default()
    }];

    let pod = lower(&wp);
    let volumes = pod.spec.as_ref().unwrap().volumes.clone().unwrap();
    let nfs = volumes[0].nfs.as_ref().unwrap();
    assert_eq!(nfs.server, "fs.local");
    assert_eq!(nfs.path, "/exports/home");
    assert!(volumes[0].secret.is_none());
}

#[test]
fn secret_mounts_are_dropped_on_raise() {
    let mut wp = descriptor();
    wp.mounts.push(Mount {
        kind: Some(MountType::Secret),
        share: "registry-creds".into(),
        mount_path: "/secrets".into(),
        ..Default::default()
    });

    let pod = lower(&wp);
    let volumes = pod.spec.as_ref().unwrap().volumes.clone().unwrap();
    assert_eq!(volumes.len(), 3);
    assert_eq!(
        volumes[2].secret.as_ref().unwrap().secret_name.as_deref(),
        Some("registry-creds")
    );

    let once = raise_to_descriptor(&pod).unwrap();
    assert_eq!(mount_targets(&once), mount_targets(&descriptor()));

    let twice = raise_to_descriptor(&lower(&once)).unwrap();
    assert_eq!(mount_targets(&twice), mount_targets(&once));
}

#[test]
fn other_volume_kinds_are_skipped() {
    let mut pod = lower(&descriptor());
    let spec = pod.spec.as_mut().unwrap();
    spec.volumes.as_mut().unwrap().push(Volume {
        name: "tmp".into(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    });
    spec.containers[0]
        .volume_mounts
        .as_mut()
        .unwrap()
        .push(VolumeMount {
            name: "tmp".into(),
            mount_path: "/tmp".into(),
            ..Default::default()
        });

    let wp = raise_to_descriptor(&pod).unwrap();
    assert_eq!(wp.mounts.len(), 2);
    assert!(wp.mounts.iter().all(|m| m.mount_path != "/tmp"));
}

#[test]
fn quantities_round_trip_in_canonical_form() {
    let half = WorkerPod {
        resource_limits: Some(Resource::new("0.5", "1.5Gi")),
        ..descriptor()
    };
    let milli = WorkerPod {
        resource_limits: Some(Resource::new("500m", "1536Mi")),
        ..descriptor()
    };

    let a = raise_to_descriptor(&lower(&half)).unwrap();
    let b = raise_to_descriptor(&lower(&milli)).unwrap();

    assert_eq!(a.resource_limits, b.resource_limits);
    assert_eq!(a.resource_limits.unwrap(), Resource::new("500m", "1536Mi"));
    assert_eq!(
        b.resource_requests.unwrap(),
        Resource::default_requests()
    );
}

#[test]
fn raise_collapses_duplicate_env_last_wins() {
    let mut pod = lower(&descriptor());
    let container = &mut pod.spec.as_mut().unwrap().containers[0];
    let env = container.env.as_mut().unwrap();
    env.push(k8s_openapi::api::core::v1::EnvVar {
        name: "MODE".into(),
        value: Some("interactive".into()),
        ..Default::default()
    });

    let wp = raise_to_descriptor(&pod).unwrap();
    assert_eq!(wp.env["MODE"], "interactive");
}

#[test]
fn raise_without_container_fails() {
    let mut pod = lower(&descriptor());
    pod.spec.as_mut().unwrap().containers.clear();
    assert!(matches!(
        raise_to_descriptor(&pod),
        Err(MapError::MissingContainer)
    ));

    pod.spec = None;
    assert!(matches!(
        raise_to_descriptor(&pod),
        Err(MapError::MissingContainer)
    ));
}

#[test]
fn raise_handles_missing_optional_blocks() {
    let mut pod = lower(&descriptor());
    let spec = pod.spec.as_mut().unwrap();
    spec.security_context = None;
    spec.containers[0].resources = None;
    spec.containers[0].image = Some("alpine".into());

    let wp = raise_to_descriptor(&pod).unwrap();
    assert_eq!(wp.user_info, UserInfo::default());
    assert_eq!(wp.resource_limits, Some(Resource::default()));
    assert_eq!(wp.image, "alpine");
    assert_eq!(wp.image_version, "");
}
