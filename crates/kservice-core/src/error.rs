use kservice_model::QuantityError;
use thiserror::Error;

/// Failure while translating between a descriptor and a manifest.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cmd is a mandatory parameter")]
    MissingCommand,

    #[error("manifest has no container")]
    MissingContainer,

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Failure reported by the orchestrator client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("pod {name} not found in namespace {namespace}")]
    NotFound { namespace: String, name: String },

    #[error("orchestrator rejected request ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("orchestrator request failed: {0}")]
    Transport(String),

    #[error("failed to configure orchestrator client: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
