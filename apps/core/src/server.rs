//! HTTP boundary: `POST /chat`, `GET /health` and the browser page at `/`.

use crate::brain::{EmotionPipeline, PipelineResult};
use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EmotionPipeline>,
    pub request_timeout: Duration,
}

/// `/chat` body. A missing or null `text` reads as empty.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyInput | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// Any content type is accepted as long as the body parses as JSON
async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PipelineResult>, AppError> {
    let request: ChatRequest = serde_json::from_slice(&body)?;
    let text = request.text.unwrap_or_default();

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    let pipeline = state.pipeline.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        pipeline.process(&text)
    });

    let joined = tokio::time::timeout(state.request_timeout, task)
        .await
        .map_err(|e| {
            warn!("Chat request exceeded {:?}", state.request_timeout);
            AppError::from(e)
        })?;
    let result = joined??;

    Ok(Json(result))
}
