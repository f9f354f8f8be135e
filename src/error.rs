use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use civic_ai_common::ErrorBody;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum CivicAiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI_GATEWAY_API_KEY is not configured")]
    MissingApiKey,

    #[error("Malformed request body: {0}")]
    MalformedPayload(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    CreditsExhausted,

    #[error("AI Gateway error: {0}")]
    Gateway(u16),

    #[error("AI Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI Gateway returned no completion")]
    EmptyCompletion,

    #[error(transparent)]
    Analysis(#[from] civic_ai_common::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CivicAiError {
    /// 呼び出し元へ返すHTTPステータス
    ///
    /// 429/402 だけはゲートウェイの値をそのまま返し、それ以外の上流障害は 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            CivicAiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            CivicAiError::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
            CivicAiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, CivicAiError>;

impl IntoResponse for CivicAiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Error in analyze-civic-issue");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
