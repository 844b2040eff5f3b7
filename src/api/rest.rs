// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Read-only views of the signal board under `/api/v1/`. CORS is configured
// permissively; the dashboard front-end is served from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::SignalBoard;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(board: Arc<SignalBoard>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/signals", get(signals))
        .route("/api/v1/signals/:symbol", get(signal))
        .layer(cors)
        .with_state(board)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: u64,
    assets: usize,
    server_time: i64,
}

async fn health(State(board): State<Arc<SignalBoard>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: board.version(),
        assets: board.assets().len(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Signals
// =============================================================================

#[derive(Serialize)]
struct SignalsResponse {
    version: u64,
    signals: Vec<crate::app_state::AssetSignal>,
}

async fn signals(State(board): State<Arc<SignalBoard>>) -> impl IntoResponse {
    Json(SignalsResponse {
        version: board.version(),
        signals: board.snapshot(),
    })
}

async fn signal(
    State(board): State<Arc<SignalBoard>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    match board.asset_signal(&symbol.to_uppercase()) {
        Some(s) => Json(s).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown symbol {symbol}") })),
        )
            .into_response(),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::config::default_assets;

    #[tokio::test]
    async fn unknown_symbol_is_404() {
        let board = Arc::new(SignalBoard::new(default_assets()));
        let resp = signal(State(board), Path("nope".to_string())).await.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn known_symbol_is_case_insensitive() {
        let board = Arc::new(SignalBoard::new(default_assets()));
        let resp = signal(State(board), Path("btcusdt".to_string())).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let board = Arc::new(SignalBoard::new(default_assets()));
        let resp = health(State(board)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
