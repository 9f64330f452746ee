//! Worker status derivation from a pod's reported state.

use k8s_openapi::api::core::v1::Pod;
use kservice_model::{WorkerState, WorkerStatus};

/// Summarise a pod into a [`WorkerStatus`].
///
/// Reason and message start from the pod-level status and are replaced by the
/// first container's state block. Blocks are checked in the order waiting,
/// running, terminated; the first populated one wins. With no populated block
/// the state stays `Unknown`.
pub fn derive_status(pod: &Pod) -> WorkerStatus {
    let pod_status = pod.status.as_ref();
    let mut status = WorkerStatus {
        status: pod_status.and_then(|s| s.phase.clone()).unwrap_or_default(),
        reason: pod_status.and_then(|s| s.reason.clone()).unwrap_or_default(),
        message: pod_status.and_then(|s| s.message.clone()).unwrap_or_default(),
        state: WorkerState::Unknown,
        exit_code: None,
    };

    let Some(state) = pod_status
        .and_then(|s| s.container_statuses.as_ref())
        .and_then(|statuses| statuses.first())
        .and_then(|c| c.state.as_ref())
    else {
        return status;
    };

    if let Some(waiting) = &state.waiting {
        status.state = WorkerState::Waiting;
        status.reason = waiting.reason.clone().unwrap_or_default();
        status.message = waiting.message.clone().unwrap_or_default();
    } else if state.running.is_some() {
        status.state = WorkerState::Running;
    } else if let Some(terminated) = &state.terminated {
        status.state = WorkerState::Terminated;
        status.reason = terminated.reason.clone().unwrap_or_default();
        status.message = terminated.message.clone().unwrap_or_default();
        status.exit_code = Some(terminated.exit_code);
    }

    status
}
