//! SmartCore ML Model Wrapper
//!
//! This module wraps a fitted SmartCore `RandomForestRegressor` so it can be
//! persisted as a model artifact and served through the [`Regressor`] trait.

use super::models::Regressor;
use super::ScaledFeatureVector;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// SmartCore RandomForest Model Wrapper
///
/// The forest itself does not expose its input width, so it is recorded from
/// the training matrix and checked before every prediction. SmartCore indexes
/// columns directly and would panic on a mismatched row.
///
/// The width is only as trustworthy as the artifact: a file edited to claim a
/// narrower width than the forest was fitted on passes the check and panics
/// inside smartcore, which the HTTP layer reports as a 500.
#[derive(Serialize, Deserialize)]
pub struct SmartcoreRandomForest {
    n_features: usize,
    forest: Forest,
}

impl SmartcoreRandomForest {
    /// Fit a forest on `x` (one row per sample), recording its column count
    pub fn fit(
        x: &DenseMatrix<f64>,
        y: &Vec<f64>,
        params: RandomForestRegressorParameters,
    ) -> Result<Self> {
        let (_, n_features) = x.shape();
        let forest = RandomForestRegressor::fit(x, y, params)
            .map_err(|e| anyhow::anyhow!("Training failed: {:?}", e))?;

        Ok(Self { n_features, forest })
    }
}

impl std::fmt::Debug for SmartcoreRandomForest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartcoreRandomForest")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

impl Regressor for SmartcoreRandomForest {
    fn predict(&self, features: &ScaledFeatureVector) -> Result<Vec<f64>> {
        let row = features.as_slice();
        if row.len() != self.n_features {
            anyhow::bail!(
                "X has {} features, but RandomForestRegressor is expecting {} features as input",
                row.len(),
                self.n_features
            );
        }

        // Convert feature vector to DenseMatrix (1 row, n features)
        let x = DenseMatrix::new(1, row.len(), row.to_vec(), false);

        let predictions = self
            .forest
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("Prediction failed: {:?}", e))?;

        Ok(predictions)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
