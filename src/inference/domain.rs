//! Domain definitions for prediction requests and responses.

use ndarray::Array1;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of clinical features consumed by the model.
pub const N_FEATURES: usize = 13;

/// Feature names in the positional order the artifacts were fitted on.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum LaxNumber {
    Number(f64),
    Text(String),
}

/// Accept a JSON number or a string holding one.
fn lax_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LaxNumber::deserialize(deserializer)
        .map_err(|_| D::Error::custom("value is not a valid number"))?
    {
        LaxNumber::Number(n) => n,
        LaxNumber::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("value is not a valid number: {s:?}")))?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(D::Error::custom("value is not a finite number"))
    }
}

/// Request body: the thirteen clinical features of one patient.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct HeartDiseaseInput {
    /// Age in years.
    #[serde(deserialize_with = "lax_number")]
    pub age: f64,
    /// 1 = male, 0 = female.
    #[serde(deserialize_with = "lax_number")]
    pub sex: f64,
    /// Chest pain type.
    #[serde(deserialize_with = "lax_number")]
    pub cp: f64,
    /// Resting blood pressure (mm Hg).
    #[serde(deserialize_with = "lax_number")]
    pub trestbps: f64,
    /// Serum cholesterol (mg/dl).
    #[serde(deserialize_with = "lax_number")]
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl.
    #[serde(deserialize_with = "lax_number")]
    pub fbs: f64,
    /// Resting electrocardiographic result.
    #[serde(deserialize_with = "lax_number")]
    pub restecg: f64,
    /// Maximum heart rate achieved.
    #[serde(deserialize_with = "lax_number")]
    pub thalach: f64,
    /// Exercise induced angina.
    #[serde(deserialize_with = "lax_number")]
    pub exang: f64,
    /// ST depression induced by exercise relative to rest.
    #[serde(deserialize_with = "lax_number")]
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment.
    #[serde(deserialize_with = "lax_number")]
    pub slope: f64,
    /// Number of major vessels coloured by fluoroscopy.
    #[serde(deserialize_with = "lax_number")]
    pub ca: f64,
    /// Thalassemia code.
    #[serde(deserialize_with = "lax_number")]
    pub thal: f64,
}

/// Fixed-order single-row feature vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.0
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.0.to_vec())
    }
}

impl From<&HeartDiseaseInput> for FeatureVector {
    fn from(input: &HeartDiseaseInput) -> Self {
        FeatureVector([
            input.age,
            input.sex,
            input.cp,
            input.trestbps,
            input.chol,
            input.fbs,
            input.restecg,
            input.thalach,
            input.exang,
            input.oldpeak,
            input.slope,
            input.ca,
            input.thal,
        ])
    }
}

/// Categorical rendering of the predicted class.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLabel {
    /// "High Risk" exactly when the predicted class is 1.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            RiskLabel::High
        } else {
            RiskLabel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk",
            RiskLabel::Low => "Low Risk",
        }
    }
}

/// Response body of a successful prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub risk_score: f64,
    pub risk_label: RiskLabel,
}
