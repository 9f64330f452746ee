//! Client-facing data model of the worker service.
//!
//! These types are the flat, JSON-friendly shapes exchanged over the HTTP API.
//! Translation to and from orchestrator manifests lives in `kservice-core`.

mod domain;
pub use domain::*;
