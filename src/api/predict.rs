use axum::{body::Bytes, extract::State, Json};

use crate::{api::error::ApiError, ml::PredictionResult, state::AppState};

/// POST /predict - Predict energy consumption for one feature set
///
/// The body is parsed by the pipeline itself so that malformed JSON is
/// reported with the same `{"error": ...}` shape as every other failure.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, ApiError> {
    tracing::debug!(bytes = body.len(), "received a request to /predict");

    let result = state.pipeline.predict_json(&body)?;

    tracing::info!(
        predicted_consumption = result.predicted_consumption,
        "prediction served"
    );
    Ok(Json(result))
}
