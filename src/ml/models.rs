//! ML Model Definitions
//!
//! Concrete regressors the service can load, plus the tagged artifact enum
//! that is written to and read from disk.

use super::smartcore::SmartcoreRandomForest;
use super::ScaledFeatureVector;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Trait for fitted regression models
#[cfg_attr(test, mockall::automock)]
pub trait Regressor: Send + Sync {
    /// Predict from one scaled row, returning the model's output column
    fn predict(&self, features: &ScaledFeatureVector) -> Result<Vec<f64>>;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;
}

/// Simple Linear Regression Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, features: &ScaledFeatureVector) -> Result<Vec<f64>> {
        let x = features.as_slice();
        if x.len() != self.coefficients.len() {
            anyhow::bail!(
                "X has {} features, but LinearRegression is expecting {} features as input",
                x.len(),
                self.coefficients.len()
            );
        }

        let prediction: f64 = x
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept;

        Ok(vec![prediction])
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// On-disk model representation
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(SmartcoreRandomForest),
    Linear(LinearRegressionModel),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::RandomForest(_) => "random_forest",
            ModelArtifact::Linear(_) => "linear",
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, features: &ScaledFeatureVector) -> Result<Vec<f64>> {
        match self {
            ModelArtifact::RandomForest(m) => m.predict(features),
            ModelArtifact::Linear(m) => m.predict(features),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::RandomForest(m) => m.n_features(),
            ModelArtifact::Linear(m) => m.n_features(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_prediction() {
        let model = LinearRegressionModel::new(vec![1.0, 2.0, 0.0, -1.0, 0.5], 10.0);
        let x = ScaledFeatureVector::new([1.0, 1.0, 5.0, 2.0, 4.0]);

        let out = model.predict(&x).unwrap();
        assert_eq!(out, vec![13.0]); // 1 + 2 + 0 - 2 + 2 + 10
    }

    #[test]
    fn test_linear_feature_count_mismatch() {
        let model = LinearRegressionModel::new(vec![1.0; 3], 0.0);
        let x = ScaledFeatureVector::new([0.0; 5]);

        let err = model.predict(&x).unwrap_err();
        assert!(err.to_string().contains("expecting 3 features"));
    }

    #[test]
    fn test_artifact_dispatch() {
        let artifact = ModelArtifact::Linear(LinearRegressionModel::new(vec![1.0; 5], 0.5));
        assert_eq!(artifact.kind(), "linear");
        assert_eq!(artifact.n_features(), 5);

        let out = artifact
            .predict(&ScaledFeatureVector::new([1.0; 5]))
            .unwrap();
        assert_eq!(out, vec![5.5]);
    }
}
