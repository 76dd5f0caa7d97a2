//! Prediction path: feature vector → scaling → classification → response.

use crate::artifacts::{ArtifactKind, Artifacts};
use crate::common::error::{ComputeError, PredictError, PredictResult};

use super::domain::{FeatureVector, HeartDiseaseInput, PredictionResponse, RiskLabel};

/// Score one patient record against the loaded artifacts.
pub fn predict(
    artifacts: &Artifacts,
    input: &HeartDiseaseInput,
) -> PredictResult<PredictionResponse> {
    let model = artifacts
        .model
        .as_ref()
        .ok_or(PredictError::Unavailable(ArtifactKind::Model))?;
    let scaler = artifacts
        .scaler
        .as_ref()
        .ok_or(PredictError::Unavailable(ArtifactKind::Scaler))?;

    let raw = FeatureVector::from(input).to_array();
    let scaled = scaler.transform(&raw)?;
    let outcome = model.classify(&scaled)?;

    let risk_score = match outcome.positive_proba {
        Some(p) => p,
        None => {
            // Class value stands in for a probability; kept as-is, see DESIGN.md.
            log::debug!("{} has no predict_proba, using class as risk score", model.name());
            f64::from(outcome.class)
        }
    };
    if !risk_score.is_finite() {
        return Err(ComputeError::NonFinite("risk score").into());
    }

    Ok(PredictionResponse {
        risk_score,
        risk_label: RiskLabel::from_class(outcome.class),
    })
}
