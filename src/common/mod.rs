//! Shared utilities that glue the artifact, inference and api layers together.
pub mod config;
pub mod error;
pub mod log;
pub mod time;

pub use error::{ArtifactError, ComputeError, PredictError, PredictResult, ServiceCode};
