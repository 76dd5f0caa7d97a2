//! Domain types for the pre-fitted scaler and classifier artifacts.
//!
//! Artifacts are JSON exports of estimators fitted offline. Each object is
//! tagged by `kind`; vectors are plain JSON arrays.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Deserializer};

use crate::common::error::{ArtifactError, ComputeError};

/// Which of the two artifacts a message or error refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "Model",
            ArtifactKind::Scaler => "Scaler",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn vector<'de, D>(deserializer: D) -> Result<Array1<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<f64>::deserialize(deserializer).map(Array1::from)
}

fn ensure_features(
    estimator: &'static str,
    expected: usize,
    x: &Array1<f64>,
) -> Result<(), ComputeError> {
    if x.len() == expected {
        Ok(())
    } else {
        Err(ComputeError::DimensionMismatch {
            estimator,
            expected,
            got: x.len(),
        })
    }
}

/// Per-feature standardisation: `z = (x - mean) / scale`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StandardScaler {
    #[serde(deserialize_with = "vector")]
    pub mean: Array1<f64>,
    #[serde(deserialize_with = "vector")]
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        }
    }
}

/// Per-feature range mapping: `z = x * scale + min`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MinMaxScaler {
    #[serde(deserialize_with = "vector")]
    pub min: Array1<f64>,
    #[serde(deserialize_with = "vector")]
    pub scale: Array1<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            min: Array1::from(min),
            scale: Array1::from(scale),
        }
    }
}

/// Feature scaler artifact.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    StandardScaler(StandardScaler),
    MinMaxScaler(MinMaxScaler),
}

impl ScalerArtifact {
    pub fn name(&self) -> &'static str {
        match self {
            ScalerArtifact::StandardScaler(_) => "StandardScaler",
            ScalerArtifact::MinMaxScaler(_) => "MinMaxScaler",
        }
    }

    /// Number of input features the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        match self {
            ScalerArtifact::StandardScaler(s) => s.mean.len(),
            ScalerArtifact::MinMaxScaler(s) => s.min.len(),
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        let (a, b) = match self {
            ScalerArtifact::StandardScaler(s) => (s.mean.len(), s.scale.len()),
            ScalerArtifact::MinMaxScaler(s) => (s.min.len(), s.scale.len()),
        };
        if a == 0 {
            return Err(ArtifactError::invalid(
                ArtifactKind::Scaler,
                format!("{} has no fitted features", self.name()),
            ));
        }
        if a != b {
            return Err(ArtifactError::invalid(
                ArtifactKind::Scaler,
                format!("{} parameter lengths differ ({a} vs {b})", self.name()),
            ));
        }
        Ok(())
    }

    /// Transform a single raw row.
    pub fn transform(&self, x: &Array1<f64>) -> Result<Array1<f64>, ComputeError> {
        ensure_features(self.name(), self.n_features(), x)?;
        let out = match self {
            ScalerArtifact::StandardScaler(s) => (x - &s.mean) / &s.scale,
            ScalerArtifact::MinMaxScaler(s) => x * &s.scale + &s.min,
        };
        Ok(out)
    }
}

/// Coefficients of a fitted linear decision function `coef·z + intercept`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinearModel {
    #[serde(deserialize_with = "vector")]
    pub coef: Array1<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef: Array1::from(coef),
            intercept,
        }
    }

    fn decision_function(
        &self,
        estimator: &'static str,
        z: &Array1<f64>,
    ) -> Result<f64, ComputeError> {
        ensure_features(estimator, self.coef.len(), z)?;
        let d = self.coef.dot(z) + self.intercept;
        if d.is_finite() {
            Ok(d)
        } else {
            Err(ComputeError::NonFinite(estimator))
        }
    }
}

/// A named pipeline stage.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NamedStep<T> {
    pub name: String,
    pub step: T,
}

/// Scalers applied in order before a final estimator.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Pipeline {
    #[serde(default)]
    pub steps: Vec<NamedStep<ScalerArtifact>>,
    pub estimator: NamedStep<Box<ClassifierArtifact>>,
}

/// Binary classifier artifact.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LinearModel),
    LinearSvc(LinearModel),
    Pipeline(Pipeline),
}

/// Class decision plus the positive-class probability when the estimator
/// supports probability estimation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Classification {
    pub class: u8,
    pub positive_proba: Option<f64>,
}

fn sigmoid(d: f64) -> f64 {
    1.0 / (1.0 + (-d).exp())
}

impl ClassifierArtifact {
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierArtifact::LogisticRegression(_) => "LogisticRegression",
            ClassifierArtifact::LinearSvc(_) => "LinearSVC",
            ClassifierArtifact::Pipeline(_) => "Pipeline",
        }
    }

    /// Whether `classify` reports a class probability.
    pub fn supports_proba(&self) -> bool {
        match self {
            ClassifierArtifact::LogisticRegression(_) => true,
            ClassifierArtifact::LinearSvc(_) => false,
            ClassifierArtifact::Pipeline(p) => p.estimator.step.supports_proba(),
        }
    }

    /// Number of features expected by the first stage.
    pub fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::LogisticRegression(m) | ClassifierArtifact::LinearSvc(m) => {
                m.coef.len()
            }
            ClassifierArtifact::Pipeline(p) => p
                .steps
                .first()
                .map(|s| s.step.n_features())
                .unwrap_or_else(|| p.estimator.step.n_features()),
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ClassifierArtifact::LogisticRegression(m) | ClassifierArtifact::LinearSvc(m) => {
                if m.coef.is_empty() {
                    return Err(ArtifactError::invalid(
                        ArtifactKind::Model,
                        format!("{} has no coefficients", self.name()),
                    ));
                }
                if !m.intercept.is_finite() || m.coef.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::invalid(
                        ArtifactKind::Model,
                        format!("{} has non-finite parameters", self.name()),
                    ));
                }
                Ok(())
            }
            ClassifierArtifact::Pipeline(p) => {
                for named in &p.steps {
                    named.step.validate().map_err(|err| {
                        ArtifactError::invalid(
                            ArtifactKind::Model,
                            format!("step '{}': {err}", named.name),
                        )
                    })?;
                }
                p.estimator.step.validate()?;
                let mut dims = p
                    .steps
                    .iter()
                    .map(|s| (s.name.as_str(), s.step.n_features()))
                    .chain(std::iter::once((
                        p.estimator.name.as_str(),
                        p.estimator.step.n_features(),
                    )));
                if let Some((_, first)) = dims.next() {
                    if let Some((name, n)) = dims.find(|(_, n)| *n != first) {
                        return Err(ArtifactError::invalid(
                            ArtifactKind::Model,
                            format!(
                                "step '{name}' expects {n} features, pipeline input has {first}"
                            ),
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Classify one scaled row.
    pub fn classify(&self, z: &Array1<f64>) -> Result<Classification, ComputeError> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => {
                let d = m.decision_function(self.name(), z)?;
                Ok(Classification {
                    class: u8::from(d > 0.0),
                    positive_proba: Some(sigmoid(d)),
                })
            }
            ClassifierArtifact::LinearSvc(m) => {
                let d = m.decision_function(self.name(), z)?;
                Ok(Classification {
                    class: u8::from(d > 0.0),
                    positive_proba: None,
                })
            }
            ClassifierArtifact::Pipeline(p) => {
                let mut row = z.clone();
                for named in &p.steps {
                    row = named.step.transform(&row)?;
                }
                p.estimator.step.classify(&row)
            }
        }
    }

    /// Human readable summary: type, parameters and, for pipelines, steps.
    pub fn describe(&self) -> String {
        let mut out = format!("Type: {}\nContent: {self:?}\n", self.name());
        if let ClassifierArtifact::Pipeline(p) = self {
            out.push_str("Model is a Pipeline.\n");
            let steps: Vec<String> = p
                .steps
                .iter()
                .map(|s| format!("('{}', {})", s.name, s.step.name()))
                .chain(std::iter::once(format!(
                    "('{}', {})",
                    p.estimator.name,
                    p.estimator.step.name()
                )))
                .collect();
            out.push_str(&format!("Steps: [{}]\n", steps.join(", ")));
        }
        out
    }
}

/// Source of the two artifacts.
pub trait ArtifactRepo {
    /// Where the artifact is read from, for diagnostics.
    fn location(&self, kind: ArtifactKind) -> String;
    fn load_classifier(&self) -> Result<ClassifierArtifact, ArtifactError>;
    fn load_scaler(&self) -> Result<ScalerArtifact, ArtifactError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn standard_scaler_centres_and_scales() {
        let scaler =
            ScalerArtifact::StandardScaler(StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]));
        let z = scaler.transform(&array![3.0, 0.0]).unwrap();
        assert_abs_diff_eq!(z[0], 1.0);
        assert_abs_diff_eq!(z[1], -2.0);
    }

    #[test]
    fn min_max_scaler_maps_range() {
        let scaler =
            ScalerArtifact::MinMaxScaler(MinMaxScaler::new(vec![-0.5, 0.0], vec![0.25, 0.1]));
        let z = scaler.transform(&array![4.0, 5.0]).unwrap();
        assert_abs_diff_eq!(z[0], 0.5);
        assert_abs_diff_eq!(z[1], 0.5);
    }

    #[test]
    fn scaler_rejects_wrong_width() {
        let scaler =
            ScalerArtifact::StandardScaler(StandardScaler::new(vec![0.0; 12], vec![1.0; 12]));
        let err = scaler.transform(&Array1::zeros(13)).unwrap_err();
        assert_eq!(
            err,
            ComputeError::DimensionMismatch {
                estimator: "StandardScaler",
                expected: 12,
                got: 13
            }
        );
    }

    #[test]
    fn scaler_validation_checks_lengths() {
        let bad = ScalerArtifact::StandardScaler(StandardScaler::new(vec![0.0; 3], vec![1.0; 2]));
        assert!(matches!(
            bad.validate(),
            Err(ArtifactError::Invalid {
                kind: ArtifactKind::Scaler,
                ..
            })
        ));
        let empty = ScalerArtifact::MinMaxScaler(MinMaxScaler::new(vec![], vec![]));
        assert!(empty.validate().is_err());
    }

    #[test]
    fn logistic_regression_reports_probability() {
        let model =
            ClassifierArtifact::LogisticRegression(LinearModel::new(vec![1.0, -1.0], 0.0));
        let pos = model.classify(&array![2.0, 0.0]).unwrap();
        assert_eq!(pos.class, 1);
        assert_abs_diff_eq!(pos.positive_proba.unwrap(), sigmoid(2.0));

        let neg = model.classify(&array![0.0, 2.0]).unwrap();
        assert_eq!(neg.class, 0);
        assert!(neg.positive_proba.unwrap() < 0.5);
    }

    #[test]
    fn boundary_decision_is_negative_class() {
        let model = ClassifierArtifact::LogisticRegression(LinearModel::new(vec![1.0], 0.0));
        let c = model.classify(&array![0.0]).unwrap();
        assert_eq!(c.class, 0);
        assert_abs_diff_eq!(c.positive_proba.unwrap(), 0.5);
    }

    #[test]
    fn linear_svc_has_no_probability() {
        let model = ClassifierArtifact::LinearSvc(LinearModel::new(vec![0.5], -1.0));
        assert!(!model.supports_proba());
        let c = model.classify(&array![4.0]).unwrap();
        assert_eq!(
            c,
            Classification {
                class: 1,
                positive_proba: None
            }
        );
    }

    #[test]
    fn non_finite_decision_is_an_error() {
        let model = ClassifierArtifact::LogisticRegression(LinearModel::new(vec![1.0], 0.0));
        let err = model.classify(&array![f64::NAN]).unwrap_err();
        assert_eq!(err, ComputeError::NonFinite("LogisticRegression"));
    }

    #[test]
    fn pipeline_applies_steps_before_estimator() {
        let json = r#"{
            "kind": "pipeline",
            "steps": [{"name": "scaler", "step": {"kind": "standard_scaler", "mean": [10.0], "scale": [2.0]}}],
            "estimator": {"name": "clf", "step": {"kind": "logistic_regression", "coef": [1.0], "intercept": 0.0}}
        }"#;
        let model: ClassifierArtifact = serde_json::from_str(json).unwrap();
        model.validate().unwrap();
        assert!(model.supports_proba());
        assert_eq!(model.n_features(), 1);

        let c = model.classify(&array![14.0]).unwrap();
        assert_eq!(c.class, 1);
        assert_abs_diff_eq!(c.positive_proba.unwrap(), sigmoid(2.0));
    }

    #[test]
    fn pipeline_validation_catches_width_mismatch() {
        let json = r#"{
            "kind": "pipeline",
            "steps": [{"name": "scaler", "step": {"kind": "standard_scaler", "mean": [0.0, 0.0], "scale": [1.0, 1.0]}}],
            "estimator": {"name": "svc", "step": {"kind": "linear_svc", "coef": [1.0, 2.0, 3.0], "intercept": 0.0}}
        }"#;
        let model: ClassifierArtifact = serde_json::from_str(json).unwrap();
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("step 'svc' expects 3 features"));
    }

    #[test]
    fn describe_lists_pipeline_steps() {
        let model = ClassifierArtifact::Pipeline(Pipeline {
            steps: vec![NamedStep {
                name: "scaler".into(),
                step: ScalerArtifact::StandardScaler(StandardScaler::new(vec![0.0], vec![1.0])),
            }],
            estimator: NamedStep {
                name: "svc".into(),
                step: Box::new(ClassifierArtifact::LinearSvc(LinearModel::new(vec![1.0], 0.0))),
            },
        });
        let text = model.describe();
        assert!(text.starts_with("Type: Pipeline\n"));
        assert!(text.contains("Model is a Pipeline."));
        assert!(text.contains("Steps: [('scaler', StandardScaler), ('svc', LinearSVC)]"));

        let plain = ClassifierArtifact::LinearSvc(LinearModel::new(vec![1.0], 0.0)).describe();
        assert!(plain.starts_with("Type: LinearSVC\n"));
        assert!(!plain.contains("Pipeline"));
    }

    #[test]
    fn unknown_kind_does_not_parse() {
        let res: Result<ClassifierArtifact, _> =
            serde_json::from_str(r#"{"kind": "random_forest", "trees": []}"#);
        assert!(res.is_err());
    }
}
