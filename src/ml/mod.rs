//! Machine Learning Module
//!
//! This module holds everything needed to serve the consumption model:
//! - Feature definitions and the fixed column order
//! - Fitted scalers (standard and min-max)
//! - Fitted regressors (SmartCore random forest, linear)
//! - Artifact loading from disk
//! - The per-request inference pipeline
//!
//! # Architecture
//! Artifacts are loaded once at startup and held behind `Arc` for the lifetime
//! of the process. The pipeline only ever borrows them immutably, so requests
//! can run concurrently without locking.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

pub mod artifacts;
pub mod inference;
pub mod models;
pub mod scaler;
pub mod smartcore;

pub use artifacts::{ArtifactError, ArtifactKind, Artifacts};
pub use inference::{InferencePipeline, PipelineError, PredictRequest, PredictionResult};
pub use models::{LinearRegressionModel, ModelArtifact, Regressor};
pub use scaler::{MinMaxScaler, Scaler, ScalerArtifact, StandardScaler};

/// Advisory text attached to every successful prediction.
pub const ENERGY_SAVING_SUGGESTION: &str = "Reduce light usage to save 5% energy.";

/// Input features, declared in the column order the scaler and model were fit on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum Feature {
    #[strum(serialize = "lights")]
    Lights,
    #[strum(serialize = "T_in")]
    IndoorTemperature,
    #[strum(serialize = "RH_in")]
    IndoorHumidity,
    #[strum(serialize = "T_out")]
    OutdoorTemperature,
    #[strum(serialize = "Windspeed")]
    WindSpeed,
}

impl Feature {
    /// Wire name of the feature, as used in request and response bodies
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Number of model input columns
pub const FEATURE_COUNT: usize = Feature::COUNT;

/// Raw feature values in model column order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub features: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(features: [f64; FEATURE_COUNT]) -> Self {
        Self { features }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.features
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.features[feature as usize]
    }
}

/// Feature values after the fitted scaler has been applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledFeatureVector {
    pub features: [f64; FEATURE_COUNT],
}

impl ScaledFeatureVector {
    pub fn new(features: [f64; FEATURE_COUNT]) -> Self {
        Self { features }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.features
    }
}
