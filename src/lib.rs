// lib.rs - heart disease risk service core
pub mod api;
pub mod artifacts;
pub mod common;
pub mod inference;

pub use api::{router, AppState};
pub use artifacts::{Artifacts, FsArtifactRepo};
pub use inference::{HeartDiseaseInput, PredictionResponse, RiskLabel};
