//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// フェンス除去後もJSONとして解釈できない
    #[error("AI returned invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),

    /// JSONだが結果の形・語彙に合わない
    #[error("AI returned an invalid analysis: {0}")]
    InvalidAnalysis(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = Error::InvalidJson(json_error);
        assert_eq!(error.to_string(), "AI returned invalid JSON format");
    }

    #[test]
    fn test_error_display_invalid_analysis() {
        let error = Error::InvalidAnalysis("severity `severe` is not allowed".to_string());
        assert_eq!(
            error.to_string(),
            "AI returned an invalid analysis: severity `severe` is not allowed"
        );
    }

    #[test]
    fn test_error_source_is_kept() {
        use std::error::Error as _;

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::InvalidJson(json_error);
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidAnalysis("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidAnalysis"));
        assert!(debug.contains("テスト"));
    }
}
