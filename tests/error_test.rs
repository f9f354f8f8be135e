//! エラーケーステスト
//!
//! エラー表示とHTTPステータスの対応を検証

use axum::http::StatusCode;
use axum::response::IntoResponse;
use civic_issue_ai::error::CivicAiError;

/// 呼び出し元に見せるメッセージ
#[test]
fn test_error_display() {
    let cases = vec![
        (CivicAiError::MissingApiKey, "AI_GATEWAY_API_KEY is not configured"),
        (CivicAiError::RateLimited, "Rate limit exceeded. Please try again later."),
        (CivicAiError::CreditsExhausted, "AI credits exhausted. Please add credits to continue."),
        (CivicAiError::Gateway(500), "AI Gateway error: 500"),
        (CivicAiError::EmptyCompletion, "AI Gateway returned no completion"),
        (CivicAiError::FileNotFound("a.jpg".to_string()), "File not found: a.jpg"),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

/// 429/402 以外の上流障害はすべて 500
#[test]
fn test_upstream_failures_are_500() {
    for err in [
        CivicAiError::Gateway(400),
        CivicAiError::Gateway(401),
        CivicAiError::Gateway(502),
        CivicAiError::EmptyCompletion,
        CivicAiError::MissingApiKey,
        CivicAiError::Config("broken".to_string()),
    ] {
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

/// レスポンス本体は { "error": ... }
#[tokio::test]
async fn test_error_body_shape() {
    let response = CivicAiError::RateLimited.into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({"error": "Rate limit exceeded. Please try again later."}));
}

/// IOエラーからの変換
#[test]
fn test_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
    let error: CivicAiError = io_error.into();
    assert!(matches!(error, CivicAiError::Io(_)));
}
