//! Artifact loading
//!
//! The scaler and the model are read once at startup. Each load is isolated:
//! a missing or corrupt file is logged and leaves that artifact absent, and the
//! service keeps running so the failure surfaces per request instead.

use super::models::{ModelArtifact, Regressor};
use super::scaler::{Scaler, ScalerArtifact};
use crate::config::ArtifactsConfig;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::Display;
use thiserror::Error;
use tracing::{error, info, warn};

/// Which artifact a diagnostic or error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ArtifactKind {
    Scaler,
    Model,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found at path: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Encoding chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Json,
    Bincode,
}

impl Encoding {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Encoding::Json,
            _ => Encoding::Bincode,
        }
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = match Encoding::for_path(path) {
        Encoding::Json => serde_json::from_slice(&bytes).map_err(|e| e.to_string()),
        Encoding::Bincode => bincode::deserialize(&bytes).map_err(|e| e.to_string()),
    };

    decoded.map_err(|reason| ArtifactError::Decode {
        path: path.to_path_buf(),
        reason,
    })
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let bytes = match Encoding::for_path(path) {
        Encoding::Json => serde_json::to_vec_pretty(value).map_err(|e| e.to_string()),
        Encoding::Bincode => bincode::serialize(value).map_err(|e| e.to_string()),
    }
    .map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;

    std::fs::write(path, bytes).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a model artifact, reporting why it could not be used
pub fn read_model(path: impl AsRef<Path>) -> Result<ModelArtifact, ArtifactError> {
    read_artifact(path.as_ref())
}

/// Read a scaler artifact, reporting why it could not be used
pub fn read_scaler(path: impl AsRef<Path>) -> Result<ScalerArtifact, ArtifactError> {
    let path = path.as_ref();
    let scaler: ScalerArtifact = read_artifact(path)?;
    scaler.validate().map_err(|e| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(scaler)
}

pub fn write_model(path: impl AsRef<Path>, model: &ModelArtifact) -> Result<(), ArtifactError> {
    write_artifact(path.as_ref(), model)
}

pub fn write_scaler(path: impl AsRef<Path>, scaler: &ScalerArtifact) -> Result<(), ArtifactError> {
    write_artifact(path.as_ref(), scaler)
}

fn report_presence(kind: ArtifactKind, path: &Path) {
    if path.exists() {
        info!(artifact = %kind, path = %path.display(), "artifact file found");
    } else {
        error!(artifact = %kind, path = %path.display(), "artifact file not found");
    }
}

/// Load the model, logging the outcome. Never fails the caller.
pub fn load_model(path: impl AsRef<Path>) -> Option<Arc<dyn Regressor>> {
    let path = path.as_ref();
    report_presence(ArtifactKind::Model, path);

    match read_model(path) {
        Ok(model) => {
            info!(
                path = %path.display(),
                kind = model.kind(),
                n_features = model.n_features(),
                "model loaded successfully"
            );
            warn_on_width(ArtifactKind::Model, model.n_features());
            Some(Arc::new(model))
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "error loading model");
            None
        }
    }
}

/// Load the scaler, logging the outcome. Never fails the caller.
pub fn load_scaler(path: impl AsRef<Path>) -> Option<Arc<dyn Scaler>> {
    let path = path.as_ref();
    report_presence(ArtifactKind::Scaler, path);

    match read_scaler(path) {
        Ok(scaler) => {
            info!(
                path = %path.display(),
                n_features = scaler.n_features(),
                "scaler loaded successfully"
            );
            warn_on_width(ArtifactKind::Scaler, scaler.n_features());
            Some(Arc::new(scaler))
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "error loading scaler");
            None
        }
    }
}

fn warn_on_width(kind: ArtifactKind, n_features: usize) {
    if n_features != super::FEATURE_COUNT {
        warn!(
            artifact = %kind,
            n_features,
            expected = super::FEATURE_COUNT,
            "artifact width differs from the request feature count; predictions will fail"
        );
    }
}

/// The two process-wide artifacts. Either may be absent.
#[derive(Clone, Default)]
pub struct Artifacts {
    pub scaler: Option<Arc<dyn Scaler>>,
    pub model: Option<Arc<dyn Regressor>>,
}

impl Artifacts {
    pub fn new(scaler: Option<Arc<dyn Scaler>>, model: Option<Arc<dyn Regressor>>) -> Self {
        Self { scaler, model }
    }

    pub fn load(cfg: &ArtifactsConfig) -> Self {
        let model = load_model(&cfg.model_path);
        let scaler = load_scaler(&cfg.scaler_path);
        Self { scaler, model }
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler_loaded", &self.scaler.is_some())
            .field("model_loaded", &self.model.is_some())
            .finish()
    }
}
