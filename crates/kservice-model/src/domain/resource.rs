use serde::{Deserialize, Serialize};

use crate::{Quantity, QuantityError};

/// CPU and memory amounts for a worker container.
///
/// Both fields hold orchestrator quantity strings (`"200m"`, `"400Mi"`).
/// An empty string means the amount is left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cpu: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memory: String,
}

impl Resource {
    pub fn new(cpu: impl Into<String>, memory: impl Into<String>) -> Self {
        Self {
            cpu: cpu.into(),
            memory: memory.into(),
        }
    }

    /// Requests applied when a descriptor carries none.
    pub fn default_requests() -> Self {
        Self::new("100m", "300Mi")
    }

    /// Limits applied when a descriptor carries none.
    pub fn default_limits() -> Self {
        Self::new("200m", "400Mi")
    }

    /// Parsed CPU amount, `None` when unset.
    pub fn cpu_quantity(&self) -> Result<Option<Quantity>, QuantityError> {
        parse_optional(&self.cpu)
    }

    /// Parsed memory amount, `None` when unset.
    pub fn memory_quantity(&self) -> Result<Option<Quantity>, QuantityError> {
        parse_optional(&self.memory)
    }
}

fn parse_optional(raw: &str) -> Result<Option<Quantity>, QuantityError> {
    if raw.is_empty() {
        return Ok(None);
    }
    Quantity::parse(raw).map(Some)
}
