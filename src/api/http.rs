//! HTTP surface: routing, CORS and mapping of typed errors to status codes.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::artifacts::Artifacts;
use crate::common::config::PROJECT_NAME;
use crate::common::error::{PredictError, ServiceCode};
use crate::common::time;
use crate::inference::{self, HeartDiseaseInput, PredictionResponse};

/// Request-independent context shared by every handler.
#[derive(Clone)]
pub struct AppState {
    artifacts: Arc<Artifacts>,
}

impl AppState {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }
}

/// Error returned by handlers, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Predict(PredictError),
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Predict(PredictError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Predict(PredictError::InferenceFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> ServiceCode {
        match self {
            ApiError::Predict(err) => err.code(),
            ApiError::InvalidBody(_) => ServiceCode::InvalidInput,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Predict(err) => err.to_string(),
            ApiError::InvalidBody(msg) => msg.clone(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError::Predict(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new().route("/predict", post(predict));

    Router::new()
        .route("/", get(read_root))
        .nest("/api/v1", v1)
        .layer(cors)
        .with_state(state)
}

async fn read_root() -> Json<serde_json::Value> {
    Json(json!({ "message": format!("Welcome to {PROJECT_NAME}") }))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<HeartDiseaseInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();
    let result = payload.map_err(ApiError::from).and_then(|Json(input)| {
        inference::predict(state.artifacts(), &input).map_err(ApiError::from)
    });

    let dur_ms = time::elapsed_ms(start);
    match &result {
        Ok(res) => log::info!(
            "ev=predict code={} status=200 label={:?} dur_ms={dur_ms}",
            ServiceCode::Ok as u32,
            res.risk_label.as_str()
        ),
        Err(err) => log::warn!(
            "ev=predict code={} status={} detail={:?} dur_ms={dur_ms}",
            err.code() as u32,
            err.status().as_u16(),
            err.detail()
        ),
    }

    result.map(Json)
}
