pub mod client;
pub use client::{KubePodClient, PodClient};
pub mod config;
pub use config::ServiceConfig;
pub mod error;
pub use error::{ClientError, ConfigError, MapError};
pub mod map;
pub mod status;
