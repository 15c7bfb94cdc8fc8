//! Inference Pipeline
//!
//! One call turns one request body into either a [`PredictionResult`] or a
//! [`PipelineError`]. The steps run in a fixed order:
//!
//! 1. parse the body as a JSON object
//! 2. check the five features are present and non-null, first failure wins
//! 3. require the scaler, then read the features as numbers
//! 4. scale
//! 5. require the model, then predict
//! 6. round half to even
//! 7. attach the suggestion and echo the inputs back
//!
//! The pipeline only reads the shared artifacts, so a single instance serves
//! any number of concurrent requests.

use super::artifacts::{ArtifactKind, Artifacts};
use super::{Feature, FeatureVector, ENERGY_SAVING_SUGGESTION, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("{0}")]
    MalformedPayload(String),

    #[error("Missing or invalid value for {0}")]
    MissingFeature(Feature),

    #[error("{0} not loaded. Please check the server logs.")]
    ArtifactUnavailable(ArtifactKind),

    #[error("{0}")]
    Runtime(String),
}

impl PipelineError {
    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MalformedPayload(_) | PipelineError::MissingFeature(_)
        )
    }

    fn runtime(e: anyhow::Error) -> Self {
        PipelineError::Runtime(e.to_string())
    }
}

/// Prediction request body. Values are kept as raw JSON so they can be echoed
/// back exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub lights: Option<Value>,
    #[serde(rename = "T_in", default)]
    pub t_in: Option<Value>,
    #[serde(rename = "RH_in", default)]
    pub rh_in: Option<Value>,
    #[serde(rename = "T_out", default)]
    pub t_out: Option<Value>,
    #[serde(rename = "Windspeed", default)]
    pub windspeed: Option<Value>,
}

impl PredictRequest {
    /// Parse a request body. Anything but a JSON object is rejected.
    pub fn from_json(body: &[u8]) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            PipelineError::MalformedPayload(format!("Failed to decode JSON object: {e}"))
        })?;

        if !value.is_object() {
            return Err(PipelineError::MalformedPayload(
                "Request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| {
            PipelineError::MalformedPayload(format!("Failed to decode JSON object: {e}"))
        })
    }

    /// Require every feature, stopping at the first missing or null one in
    /// column order.
    pub fn validate(self) -> Result<ValidatedRequest, PipelineError> {
        fn require(value: Option<Value>, feature: Feature) -> Result<Value, PipelineError> {
            value.ok_or(PipelineError::MissingFeature(feature))
        }

        Ok(ValidatedRequest {
            values: [
                require(self.lights, Feature::Lights)?,
                require(self.t_in, Feature::IndoorTemperature)?,
                require(self.rh_in, Feature::IndoorHumidity)?,
                require(self.t_out, Feature::OutdoorTemperature)?,
                require(self.windspeed, Feature::WindSpeed)?,
            ],
        })
    }
}

/// A request with all five features present, still in their received form
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    values: [Value; FEATURE_COUNT],
}

impl ValidatedRequest {
    /// Numeric interpretation of the received values
    pub fn feature_vector(&self) -> Result<FeatureVector, PipelineError> {
        let mut features = [0.0; FEATURE_COUNT];
        for (i, value) in self.values.iter().enumerate() {
            features[i] = as_number(value)?;
        }
        Ok(FeatureVector::new(features))
    }

    fn into_result(self, predicted_consumption: i64) -> PredictionResult {
        let [lights, t_in, rh_in, t_out, windspeed] = self.values;
        PredictionResult {
            lights,
            t_in,
            rh_in,
            t_out,
            windspeed,
            predicted_consumption,
            suggestion: ENERGY_SAVING_SUGGESTION.to_string(),
        }
    }
}

fn as_number(value: &Value) -> Result<f64, PipelineError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PipelineError::Runtime(format!("could not convert {n} to float"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        // numeric strings are accepted, like numpy's float64 conversion
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            PipelineError::Runtime(format!("could not convert string to float: '{s}'"))
        }),
        other => Err(PipelineError::Runtime(format!(
            "could not convert {other} to float"
        ))),
    }
}

/// Successful prediction, echoing the inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub lights: Value,
    #[serde(rename = "T_in")]
    pub t_in: Value,
    #[serde(rename = "RH_in")]
    pub rh_in: Value,
    #[serde(rename = "T_out")]
    pub t_out: Value,
    #[serde(rename = "Windspeed")]
    pub windspeed: Value,
    pub predicted_consumption: i64,
    pub suggestion: String,
}

/// Round half to even, rejecting values with no integer representation
pub fn round_prediction(raw: f64) -> Result<i64, PipelineError> {
    if raw.is_nan() {
        return Err(PipelineError::Runtime(
            "cannot convert float NaN to integer".to_string(),
        ));
    }
    if raw.is_infinite() {
        return Err(PipelineError::Runtime(
            "cannot convert float infinity to integer".to_string(),
        ));
    }

    let rounded = raw.round_ties_even();
    // i64::MAX is not representable; 2^63 is the first value out of range
    if rounded < i64::MIN as f64 || rounded >= 9_223_372_036_854_775_808.0 {
        return Err(PipelineError::Runtime(format!(
            "prediction {raw} is out of range for an integer result"
        )));
    }

    Ok(rounded as i64)
}

/// Stateless request pipeline over the loaded artifacts
#[derive(Debug, Clone, Default)]
pub struct InferencePipeline {
    artifacts: Artifacts,
}

impl InferencePipeline {
    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }

    pub fn scaler_loaded(&self) -> bool {
        self.artifacts.scaler.is_some()
    }

    pub fn model_loaded(&self) -> bool {
        self.artifacts.model.is_some()
    }

    /// Run the full pipeline on a raw request body
    pub fn predict_json(&self, body: &[u8]) -> Result<PredictionResult, PipelineError> {
        let request = PredictRequest::from_json(body)?;
        self.predict(request)
    }

    /// Run the pipeline on an already parsed request
    pub fn predict(&self, request: PredictRequest) -> Result<PredictionResult, PipelineError> {
        debug!(?request, "received prediction request");
        let validated = request.validate()?;

        let scaler = self
            .artifacts
            .scaler
            .as_ref()
            .ok_or(PipelineError::ArtifactUnavailable(ArtifactKind::Scaler))?;

        let features = validated.feature_vector()?;
        debug!(features = ?features.features, "features before scaling");

        let scaled = scaler.transform(&features).map_err(PipelineError::runtime)?;
        debug!(features = ?scaled.features, "features after scaling");

        let model = self
            .artifacts
            .model
            .as_ref()
            .ok_or(PipelineError::ArtifactUnavailable(ArtifactKind::Model))?;

        let outputs = model.predict(&scaled).map_err(PipelineError::runtime)?;
        let raw = outputs
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Runtime("Model returned empty predictions".to_string()))?;
        debug!(prediction = raw, "raw prediction");

        let predicted_consumption = round_prediction(raw)?;

        Ok(validated.into_result(predicted_consumption))
    }
}
