#![allow(dead_code)]
//! Shared helpers for the HTTP-level tests

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use energy_predictor::{
    api,
    config::Config,
    ml::{
        artifacts::{write_model, write_scaler},
        LinearRegressionModel, ModelArtifact, ScalerArtifact, StandardScaler,
    },
    state::AppState,
};

pub const SUGGESTION: &str = "Reduce light usage to save 5% energy.";

/// Scaler that leaves values untouched
pub fn identity_scaler() -> ScalerArtifact {
    ScalerArtifact::Standard(StandardScaler::new(vec![0.0; 5], vec![1.0; 5]).unwrap())
}

pub fn linear_model(coefficients: [f64; 5], intercept: f64) -> ModelArtifact {
    ModelArtifact::Linear(LinearRegressionModel::new(coefficients.to_vec(), intercept))
}

/// Write the given artifacts into `dir`, returning a config that points at them.
/// A `None` artifact leaves its path pointing at a file that does not exist.
pub fn config_with(
    dir: &Path,
    scaler: Option<&ScalerArtifact>,
    model: Option<&ModelArtifact>,
) -> Config {
    let scaler_path = dir.join("scaler.bin");
    let model_path = dir.join("random_forest_model.bin");

    if let Some(scaler) = scaler {
        write_scaler(&scaler_path, scaler).unwrap();
    }
    if let Some(model) = model {
        write_model(&model_path, model).unwrap();
    }

    let mut cfg = Config::default();
    cfg.artifacts.scaler_path = scaler_path;
    cfg.artifacts.model_path = model_path;
    cfg.views.templates_dir = templates_dir();
    cfg
}

/// Templates shipped with the crate
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn app(cfg: &Config) -> Router {
    api::router(AppState::new(cfg), cfg)
}

pub async fn post_predict(app: &Router, body: impl Into<String>) -> (StatusCode, Value) {
    post_predict_as(app, body, Some("application/json")).await
}

/// POST to /predict with the given Content-Type, or none at all
pub async fn post_predict_as(
    app: &Router,
    body: impl Into<String>,
    content_type: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/predict");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    let request = request.body(Body::from(body.into())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
