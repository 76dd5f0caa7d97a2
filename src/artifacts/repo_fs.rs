//! Filesystem repository for the classifier and scaler artifacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::common::error::ArtifactError;

use super::domain::{ArtifactKind, ArtifactRepo, ClassifierArtifact, ScalerArtifact};

/// Classifier file name inside the artifact directory.
pub const MODEL_FILE: &str = "heart_model.json";
/// Scaler file name inside the artifact directory.
pub const SCALER_FILE: &str = "scaler.json";

/// Fixed artifact directory, next to the crate sources.
pub fn default_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("ml_models")
}

/// Read and deserialize one artifact file.
pub fn read_artifact<T: DeserializeOwned>(
    kind: ArtifactKind,
    path: &Path,
) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read, deserialize and validate a classifier file.
pub fn read_classifier(path: &Path) -> Result<ClassifierArtifact, ArtifactError> {
    let model: ClassifierArtifact = read_artifact(ArtifactKind::Model, path)?;
    model.validate()?;
    Ok(model)
}

/// Read, deserialize and validate a scaler file.
pub fn read_scaler(path: &Path) -> Result<ScalerArtifact, ArtifactError> {
    let scaler: ScalerArtifact = read_artifact(ArtifactKind::Scaler, path)?;
    scaler.validate()?;
    Ok(scaler)
}

/// Artifacts stored as JSON files under a single directory.
pub struct FsArtifactRepo {
    root: PathBuf,
}

impl FsArtifactRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Model => self.root.join(MODEL_FILE),
            ArtifactKind::Scaler => self.root.join(SCALER_FILE),
        }
    }
}

impl Default for FsArtifactRepo {
    fn default() -> Self {
        Self::new(default_root())
    }
}

impl ArtifactRepo for FsArtifactRepo {
    fn location(&self, kind: ArtifactKind) -> String {
        self.path(kind).display().to_string()
    }

    fn load_classifier(&self) -> Result<ClassifierArtifact, ArtifactError> {
        read_classifier(&self.path(ArtifactKind::Model))
    }

    fn load_scaler(&self) -> Result<ScalerArtifact, ArtifactError> {
        read_scaler(&self.path(ArtifactKind::Scaler))
    }
}
