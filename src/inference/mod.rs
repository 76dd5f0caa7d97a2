//! Inference domain: one synchronous prediction per request.

pub mod domain;
pub mod service;

pub use domain::{FeatureVector, HeartDiseaseInput, PredictionResponse, RiskLabel};
pub use service::predict;
