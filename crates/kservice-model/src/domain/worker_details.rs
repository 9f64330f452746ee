use serde::{Deserialize, Serialize};

/// Identity assigned by the orchestrator to a created worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDetails {
    pub id: String,
}

/// Log envelope returned by the logs endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logs {
    #[serde(rename = "Log")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shapes() {
        let details = WorkerDetails {
            id: "worker-1a2b3c4d-xyz".into(),
        };
        assert_eq!(
            serde_json::to_string(&details).unwrap(),
            r#"{"id":"worker-1a2b3c4d-xyz"}"#
        );

        let logs = Logs {
            log: "line\n".into(),
        };
        assert_eq!(serde_json::to_string(&logs).unwrap(), r#"{"Log":"line\n"}"#);
    }
}
