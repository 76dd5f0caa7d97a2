//! Error handling primitives shared across the core.
//!
//! Load-time failures (`ArtifactError`) never cross the request boundary: the
//! loader turns them into absent artifacts. Request-time failures are the
//! two-valued `PredictError`.

use std::path::PathBuf;

use thiserror::Error;

use crate::artifacts::domain::ArtifactKind;

/// Stable codes attached to request log lines.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ServiceCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// A required artifact was not loaded.
    Unavailable = 1,
    /// Scaling or inference raised.
    InferenceFailed = 2,
    /// Request body was rejected before reaching the predictor.
    InvalidInput = 3,
}

/// Numeric failure raised while transforming or classifying a vector.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ComputeError {
    #[error("X has {got} features, but {estimator} is expecting {expected} features as input")]
    DimensionMismatch {
        estimator: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0} produced a non-finite value")]
    NonFinite(&'static str),
}

/// Failure to materialise an artifact from disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{kind} not found at {}", .path.display())]
    NotFound { kind: ArtifactKind, path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} artifact: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },
}

impl ArtifactError {
    pub fn invalid(kind: ArtifactKind, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            reason: reason.into(),
        }
    }
}

/// Outcome of a failed prediction.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("{0} not loaded or unavailable")]
    Unavailable(ArtifactKind),
    #[error("Prediction error: {0}")]
    InferenceFailed(String),
}

impl PredictError {
    pub fn code(&self) -> ServiceCode {
        match self {
            PredictError::Unavailable(_) => ServiceCode::Unavailable,
            PredictError::InferenceFailed(_) => ServiceCode::InferenceFailed,
        }
    }
}

impl From<ComputeError> for PredictError {
    fn from(err: ComputeError) -> Self {
        PredictError::InferenceFailed(err.to_string())
    }
}

/// Result alias used by the prediction path.
pub type PredictResult<T> = Result<T, PredictError>;
