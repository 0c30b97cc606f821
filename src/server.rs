//! HTTP transport
//!
//! ## Endpoints
//! - `POST /api/gerar` - body `{"caf": "..."}`, answers `{"combos": [...]}`
//!   or `{"erro": "..."}`
//! - `GET /health` - health check
//!
//! CORS allows any origin with `POST`/`OPTIONS` and the `Content-Type`
//! header, so browser preflights are answered by the CORS layer.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::search::CafGenerator;
use crate::types::GenerateError;

// ============================================================================
// Wire Types
// ============================================================================

/// Request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub caf: Option<String>,
}

/// Successful response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub combos: Vec<String>,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: String,
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router around a shared generator
pub fn router(generator: CafGenerator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/gerar", post(generate))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(generator)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(generator: CafGenerator, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("CAF generator listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(generator))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("CAF generator shutting down");
        })
        .await
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Generation endpoint
async fn generate(State(generator): State<CafGenerator>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("unreadable request body: {}", e);
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro interno: {}", e),
            );
        }
    };
    let caf = request.caf.unwrap_or_default();

    // Expansion is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || generator.generate(&caf)).await;

    match outcome {
        Ok(Ok(generated)) => Json(GenerateResponse {
            combos: generated.combos,
        })
        .into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => {
            tracing::error!("generation task failed: {}", join_error);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro interno: {}", join_error),
            )
        }
    }
}

/// Decode the request body; an empty body reads as `{}`
///
/// Content-Type is not checked. A body that fails to decode is answered
/// with the `{"erro": ...}` shape like every other failure.
pub fn parse_request(body: &[u8]) -> Result<GenerateRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body)
}

/// Status code for each error kind
pub fn status_for(error: &GenerateError) -> StatusCode {
    match error {
        GenerateError::EmptyPattern
        | GenerateError::InvalidCharacter { .. }
        | GenerateError::MalformedPeriod { .. }
        | GenerateError::Limit(_) => StatusCode::BAD_REQUEST,
        GenerateError::NoReferenceData { .. } => StatusCode::NOT_FOUND,
        GenerateError::Reference(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a GenerateError to an HTTP error response
fn error_response(error: GenerateError) -> Response {
    let status = status_for(&error);
    let message = match &error {
        GenerateError::Reference(_) => {
            tracing::error!("reference table unavailable: {}", error);
            format!("Erro interno: {}", error)
        }
        _ => {
            tracing::debug!(status = status.as_u16(), "rejected request: {}", error);
            error.to_string()
        }
    };
    error_body(status, message)
}

fn error_body(status: StatusCode, erro: String) -> Response {
    (status, Json(ErrorResponse { erro })).into_response()
}

// ============================================================================
// Tests
// ============================================================================
