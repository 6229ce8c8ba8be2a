use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::completion::CompletionService;
use super::recommend::HistoricalClaims;
use super::service::{AnalysisError, AnalysisRequest, AnalysisService};

/// Router builder exposing the scenario analysis endpoint.
pub fn analysis_router<C, H>(service: Arc<AnalysisService<C, H>>) -> Router
where
    C: CompletionService + 'static,
    H: HistoricalClaims + 'static,
{
    Router::new()
        .route("/api/v1/analyze", post(analyze_handler::<C, H>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<C, H>(
    State(service): State<Arc<AnalysisService<C, H>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    C: CompletionService + 'static,
    H: HistoricalClaims + 'static,
{
    match service.analyze(request).await {
        Ok(bundle) => (StatusCode::OK, axum::Json(bundle)).into_response(),
        Err(AnalysisError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
