//! Artifact domain: the pre-fitted scaler and classifier loaded once at start.
//!
//! Loading never fails the process. A missing or corrupt file leaves the
//! corresponding slot empty and the predictor reports it at request time.

pub mod domain;
pub mod repo_fs;

pub use domain::{ArtifactKind, ArtifactRepo, Classification, ClassifierArtifact, ScalerArtifact};
pub use repo_fs::FsArtifactRepo;

use crate::common::error::ArtifactError;

/// The loaded artifacts. Immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct Artifacts {
    pub model: Option<ClassifierArtifact>,
    pub scaler: Option<ScalerArtifact>,
}

impl Artifacts {
    pub fn new(model: Option<ClassifierArtifact>, scaler: Option<ScalerArtifact>) -> Self {
        Self { model, scaler }
    }

    /// Load both artifacts from `repo`, logging one line per artifact.
    pub fn load(repo: &dyn ArtifactRepo) -> Self {
        let model = settle(ArtifactKind::Model, repo, repo.load_classifier());
        let scaler = settle(ArtifactKind::Scaler, repo, repo.load_scaler());
        Self { model, scaler }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.scaler.is_some()
    }
}

fn settle<T>(
    kind: ArtifactKind,
    repo: &dyn ArtifactRepo,
    loaded: Result<T, ArtifactError>,
) -> Option<T> {
    match loaded {
        Ok(artifact) => {
            log::info!("{kind} loaded from {}", repo.location(kind));
            Some(artifact)
        }
        Err(ArtifactError::NotFound { .. }) => {
            log::warn!("{kind} not found at {}", repo.location(kind));
            None
        }
        Err(err) => {
            log::error!("Error loading {}: {err}", kind.as_str().to_ascii_lowercase());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::domain::{LinearModel, StandardScaler};
    use std::path::PathBuf;

    struct FakeRepo {
        model: fn() -> Result<ClassifierArtifact, ArtifactError>,
        scaler: fn() -> Result<ScalerArtifact, ArtifactError>,
    }

    impl ArtifactRepo for FakeRepo {
        fn location(&self, kind: ArtifactKind) -> String {
            format!("memory://{kind}")
        }

        fn load_classifier(&self) -> Result<ClassifierArtifact, ArtifactError> {
            (self.model)()
        }

        fn load_scaler(&self) -> Result<ScalerArtifact, ArtifactError> {
            (self.scaler)()
        }
    }

    fn good_model() -> Result<ClassifierArtifact, ArtifactError> {
        Ok(ClassifierArtifact::LogisticRegression(LinearModel::new(vec![1.0], 0.0)))
    }

    fn good_scaler() -> Result<ScalerArtifact, ArtifactError> {
        Ok(ScalerArtifact::StandardScaler(StandardScaler::new(vec![0.0], vec![1.0])))
    }

    fn missing_scaler() -> Result<ScalerArtifact, ArtifactError> {
        Err(ArtifactError::NotFound {
            kind: ArtifactKind::Scaler,
            path: PathBuf::from("scaler.json"),
        })
    }

    fn broken_model() -> Result<ClassifierArtifact, ArtifactError> {
        Err(ArtifactError::invalid(ArtifactKind::Model, "no coefficients"))
    }

    #[test]
    fn both_present_is_ready() {
        let artifacts = Artifacts::load(&FakeRepo {
            model: good_model,
            scaler: good_scaler,
        });
        assert!(artifacts.is_ready());
    }

    #[test]
    fn failures_leave_slots_empty() {
        let artifacts = Artifacts::load(&FakeRepo {
            model: broken_model,
            scaler: missing_scaler,
        });
        assert!(artifacts.model.is_none());
        assert!(artifacts.scaler.is_none());
        assert!(!artifacts.is_ready());
    }

    #[test]
    fn one_failure_does_not_affect_the_other() {
        let artifacts = Artifacts::load(&FakeRepo {
            model: good_model,
            scaler: missing_scaler,
        });
        assert!(artifacts.model.is_some());
        assert!(artifacts.scaler.is_none());
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let artifacts = Artifacts::load(&FsArtifactRepo::new(tmp.path()));
        assert!(artifacts.model.is_none() && artifacts.scaler.is_none());
    }
}
