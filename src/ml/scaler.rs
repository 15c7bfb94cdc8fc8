//! Fitted feature scalers
//!
//! A scaler maps raw feature values onto the normalized representation the
//! regressor was trained on. Parameters are fitted offline and loaded from an
//! artifact file; nothing here fits anything.

use super::{FeatureVector, ScaledFeatureVector, FEATURE_COUNT};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Trait for fitted feature transforms
#[cfg_attr(test, mockall::automock)]
pub trait Scaler: Send + Sync {
    /// Apply the fitted per-feature transform
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatureVector>;

    /// Number of input columns the scaler was fitted on
    fn n_features(&self) -> usize;
}

/// Z-score scaler: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            anyhow::bail!(
                "Standardization parameter count mismatch: {} means, {} scales",
                mean.len(),
                scale.len()
            );
        }
        Ok(Self { mean, scale })
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatureVector> {
        check_width("StandardScaler", self.mean.len())?;

        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, out) in scaled.iter_mut().enumerate() {
            // zero-variance columns were fitted with a unit scale
            let scale = if self.scale[i].abs() < 1e-10 {
                1.0
            } else {
                self.scale[i]
            };
            *out = (features.features[i] - self.mean[i]) / scale;
        }

        Ok(ScaledFeatureVector::new(scaled))
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }
}

/// Min-max scaler: `x * scale + min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if min.len() != scale.len() {
            anyhow::bail!(
                "Normalization parameter count mismatch: {} offsets, {} scales",
                min.len(),
                scale.len()
            );
        }
        Ok(Self { min, scale })
    }

    /// Build from observed per-column ranges, mapping each onto `[0, 1]`
    pub fn from_ranges(min_vals: &[f64], max_vals: &[f64]) -> Result<Self> {
        if min_vals.len() != max_vals.len() {
            anyhow::bail!("Normalization parameter count mismatch");
        }

        let (min, scale) = min_vals
            .iter()
            .zip(max_vals.iter())
            .map(|(lo, hi)| {
                let range = hi - lo;
                let scale = if range.abs() < 1e-10 { 1.0 } else { 1.0 / range };
                (-lo * scale, scale)
            })
            .unzip();

        Ok(Self { min, scale })
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatureVector> {
        check_width("MinMaxScaler", self.min.len())?;

        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, out) in scaled.iter_mut().enumerate() {
            *out = features.features[i] * self.scale[i] + self.min[i];
        }

        Ok(ScaledFeatureVector::new(scaled))
    }

    fn n_features(&self) -> usize {
        self.min.len()
    }
}

/// On-disk scaler representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    /// Reject parameter vectors of unequal length
    pub fn validate(&self) -> Result<()> {
        match self {
            ScalerArtifact::Standard(s) => {
                StandardScaler::new(s.mean.clone(), s.scale.clone())?;
            }
            ScalerArtifact::MinMax(s) => {
                MinMaxScaler::new(s.min.clone(), s.scale.clone())?;
            }
        }
        Ok(())
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, features: &FeatureVector) -> Result<ScaledFeatureVector> {
        match self {
            ScalerArtifact::Standard(s) => s.transform(features),
            ScalerArtifact::MinMax(s) => s.transform(features),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            ScalerArtifact::Standard(s) => s.n_features(),
            ScalerArtifact::MinMax(s) => s.n_features(),
        }
    }
}

fn check_width(kind: &str, expected: usize) -> Result<()> {
    if expected != FEATURE_COUNT {
        anyhow::bail!(
            "X has {} features, but {} is expecting {} features as input",
            FEATURE_COUNT,
            kind,
            expected
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector::new([10.0, 21.5, 40.0, 15.0, 3.2])
    }

    #[test]
    fn test_standard_scaler_transform() {
        let scaler = StandardScaler::new(
            vec![10.0, 20.0, 50.0, 10.0, 2.0],
            vec![5.0, 0.5, 10.0, 2.5, 0.0],
        )
        .unwrap();

        let scaled = scaler.transform(&sample()).unwrap();
        assert_eq!(scaled.features[0], 0.0); // (10-10)/5
        assert_eq!(scaled.features[1], 3.0); // (21.5-20)/0.5
        assert_eq!(scaled.features[2], -1.0); // (40-50)/10
        assert_eq!(scaled.features[3], 2.0); // (15-10)/2.5
        assert!((scaled.features[4] - 1.2).abs() < 1e-12); // zero scale treated as 1
    }

    #[test]
    fn test_min_max_scaler_from_ranges() {
        let scaler = MinMaxScaler::from_ranges(
            &[0.0, 20.0, 0.0, 10.0, 0.0],
            &[20.0, 22.0, 100.0, 20.0, 3.2],
        )
        .unwrap();

        let scaled = scaler.transform(&sample()).unwrap();
        assert!((scaled.features[0] - 0.5).abs() < 1e-12);
        assert!((scaled.features[1] - 0.75).abs() < 1e-12);
        assert!((scaled.features[2] - 0.4).abs() < 1e-12);
        assert!((scaled.features[3] - 0.5).abs() < 1e-12);
        assert!((scaled.features[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parameter_length_mismatch_rejected() {
        assert!(StandardScaler::new(vec![0.0; 5], vec![1.0; 4]).is_err());
        assert!(MinMaxScaler::new(vec![0.0; 3], vec![1.0; 5]).is_err());

        let artifact = ScalerArtifact::Standard(StandardScaler {
            mean: vec![0.0; 5],
            scale: vec![1.0; 2],
        });
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_width_mismatch_is_transform_error() {
        let scaler = StandardScaler::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
        let err = scaler.transform(&sample()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "X has 5 features, but StandardScaler is expecting 4 features as input"
        );
    }

    #[test]
    fn test_artifact_dispatch() {
        let artifact = ScalerArtifact::Standard(
            StandardScaler::new(vec![0.0; 5], vec![2.0; 5]).unwrap(),
        );
        assert_eq!(artifact.n_features(), 5);
        let scaled = artifact.transform(&sample()).unwrap();
        assert_eq!(scaled.features[0], 5.0);
    }
}
