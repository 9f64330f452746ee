//! Translation between [`WorkerPod`](kservice_model::WorkerPod) descriptors and
//! orchestrator `Pod` manifests.
//!
//! Lowering is total for any descriptor with a command and valid quantities.
//! Raising is lossy: only the first container is read and only NFS volumes
//! survive.

mod lower;
pub use lower::{
    IMAGE_PULL_POLICY, RESOURCE_CPU, RESOURCE_MEMORY, RESTART_POLICY, lower_to_manifest,
};

mod raise;
pub use raise::raise_to_descriptor;

#[cfg(test)]
mod tests;
