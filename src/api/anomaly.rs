//! Anomaly prediction API
//!
//! POST /predict-anomalies/ — delegates to the classifier artifact loaded
//! at startup.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::AnomalyQuery;
use crate::error::{ApiError, ApiResult};
use crate::services::classifier::Prediction;
use crate::state::AppState;

/// Prediction response body
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub result: &'static str,
    pub details: &'static str,
}

/// Create anomaly prediction routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/predict-anomalies/", post(predict_anomalies))
}

/// Classify a feature vector as anomalous or normal
///
/// POST /predict-anomalies/
///
/// A missing classifier artifact answers HTTP 200 with
/// `{"error": "Model file not found."}` — the contract the dashboard already
/// depends on.
async fn predict_anomalies(
    State(state): State<Arc<AppState>>,
    Json(query): Json<AnomalyQuery>,
) -> ApiResult<impl IntoResponse> {
    query.validate().map_err(ApiError::bad_request)?;

    let Some(classifier) = &state.classifier else {
        return Ok(Json(serde_json::json!({ "error": "Model file not found." })).into_response());
    };

    let response = match classifier.predict(&query.features()) {
        Prediction::Anomaly => PredictionResponse {
            result: "Anomaly detected!",
            details: "Potential network issue or attack.",
        },
        Prediction::Normal => PredictionResponse {
            result: "Normal traffic",
            details: "No anomalies detected.",
        },
    };

    Ok(Json(response).into_response())
}
