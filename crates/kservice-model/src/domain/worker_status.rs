use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse container state derived from the orchestrator's container status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    Waiting,
    Running,
    Terminated,
    #[default]
    Unknown,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Waiting => "Waiting",
            WorkerState::Running => "Running",
            WorkerState::Terminated => "Terminated",
            WorkerState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status report of a worker, computed on every status lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    /// Raw pod phase reported by the orchestrator.
    pub status: String,
    pub reason: String,
    pub state: WorkerState,
    #[serde(rename = "msg")]
    pub message: String,
    /// Only set for terminated containers.
    #[serde(rename = "exitCode", default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}
