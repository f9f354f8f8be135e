//! 通報解析プロキシのHTTP境界
//!
//! - POST /analyze-civic-issue（と /functions/v1/analyze-civic-issue）
//! - OPTIONS はCORSヘッダ付きの空200を即返す
//! - GET /health

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::error::{CivicAiError, Result};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use civic_ai_common::{AnalysisRequest, ErrorBody, ParsedAnalysis};
use serde_json::json;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

pub const ANALYZE_PATH: &str = "/analyze-civic-issue";
pub const FUNCTIONS_ANALYZE_PATH: &str = "/functions/v1/analyze-civic-issue";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bind_address: config.bind_address.clone(),
            port: config.port,
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// ブラウザから呼べるように全レスポンスへ付けるCORS
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

pub fn router(analyzer: Arc<Analyzer>, config: &ServerConfig) -> Router {
    Router::new()
        .route(ANALYZE_PATH, post(analyze_handler).options(preflight_handler))
        .route(FUNCTIONS_ANALYZE_PATH, post(analyze_handler).options(preflight_handler))
        .route(HEALTH_PATH, get(health_handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(AppState { analyzer })
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "mode": state.analyzer.mode(),
    }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(status = rejection.status().as_u16(), "Failed to read request body");
            return (rejection.status(), Json(ErrorBody::new(rejection.body_text()))).into_response();
        }
    };

    match analyze(&state.analyzer, &body).await {
        Ok(parsed) => Json(parsed.raw).into_response(),
        Err(e) => e.into_response(),
    }
}

/// ボディのパースから解析まで
///
/// APIキー未設定はボディの中身に関係なく 500
async fn analyze(analyzer: &Analyzer, body: &[u8]) -> Result<ParsedAnalysis> {
    if !analyzer.config().has_api_key() {
        return Err(CivicAiError::MissingApiKey);
    }

    let request: AnalysisRequest = serde_json::from_slice(body)
        .map_err(|e| CivicAiError::MalformedPayload(e.to_string()))?;

    // 画像も説明文も無い通報もそのまま転送する（判定は呼び出し側）
    if !request.has_evidence() {
        debug!("Request has neither image nor description");
    }

    analyzer.analyze(&request).await
}

pub async fn serve(analyzer: Arc<Analyzer>, config: ServerConfig) -> anyhow::Result<()> {
    if !analyzer.config().has_api_key() {
        warn!("AI_GATEWAY_API_KEY is not configured; every analysis request will fail");
    }

    let app = router(analyzer, &config);

    let address = config.socket_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
