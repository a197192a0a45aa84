//! Request handlers.

use super::AppState;
use crate::generator::{ErrorCategory, GenerateError, GenerateRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for `/api/random`.
///
/// Kept as raw strings so malformed values are reported through the
/// service's own error categories.
#[derive(Debug, Default, Deserialize)]
pub struct RandomQuery {
    /// Requested bit count.
    pub bits: Option<String>,
    /// Backend name.
    pub mode: Option<String>,
    /// Extractor name.
    pub extractor: Option<String>,
}

/// Failure payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable category name.
    pub error: &'static str,
    /// Human-readable description.
    pub detail: String,
}

/// Maps an error category to its HTTP status.
pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidBits | ErrorCategory::InvalidOption => StatusCode::BAD_REQUEST,
        ErrorCategory::SourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::SourceFailed => StatusCode::BAD_GATEWAY,
    }
}

/// A generation failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GenerateError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.0.category();
        let body = ErrorBody {
            error: category.as_str(),
            detail: self.0.to_string(),
        };
        (status_for(category), Json(body)).into_response()
    }
}

/// Handler for the /api/random endpoint.
pub(super) async fn random_handler(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Response {
    let request = match GenerateRequest::from_params(
        query.bits.as_deref(),
        query.mode.as_deref(),
        query.extractor.as_deref(),
        state.generator.config(),
    ) {
        Ok(request) => request,
        Err(e) => return fail(&state, e.into()),
    };

    // Sources block while measuring; keep them off the async workers.
    let generator = state.generator.clone();
    let joined = tokio::task::spawn_blocking(move || generator.generate(&request)).await;

    match joined {
        Ok(Ok(result)) => {
            state.metrics.record_success(&result);
            (StatusCode::OK, Json(result.to_response())).into_response()
        }
        Ok(Err(e)) => fail(&state, e),
        Err(e) => {
            tracing::error!(error = %e, "Generation task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "internal",
                    detail: "generation task aborted".to_owned(),
                }),
            )
                .into_response()
        }
    }
}

fn fail(state: &AppState, error: GenerateError) -> Response {
    let category = error.category();
    state.metrics.record_failure(category);
    tracing::warn!(category = %category, error = %error, "Request failed");
    ApiError(error).into_response()
}

/// Handler for the /health endpoint.
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Handler for the /metrics endpoint.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}
