//! AIレスポンスパーサー
//!
//! チャット補完の本文からコードフェンスを除去し、
//! 厳密なJSONとして解析結果を取り出す。修復や部分抽出はしない。

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, PriorityLevel, Severity};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

lazy_static::lazy_static! {
    // ```json（直後の改行込み）と ```（直前の改行込み）
    static ref FENCE_RE: Regex = Regex::new(r"```json\n?|\n?```").unwrap();
}

/// 検証済みの解析結果
///
/// `raw` はモデルが返したJSONそのもの。レスポンス本体にはこちらを使う。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub result: AnalysisResult,
    pub raw: Value,
}

/// コードフェンスを除去
///
/// # Examples
/// ```
/// use civic_ai_common::strip_code_fences;
///
/// let response = "```json\n{\"severity\": \"minor\"}\n```";
/// assert_eq!(strip_code_fences(response), "{\"severity\": \"minor\"}");
/// ```
pub fn strip_code_fences(response: &str) -> String {
    FENCE_RE.replace_all(response, "").trim().to_string()
}

/// モデルの返答をパース
///
/// # Arguments
/// * `response` - `choices[0].message.content` の文字列
///
/// # Returns
/// * `Ok(ParsedAnalysis)` - パースと語彙チェックに成功
/// * `Err(Error::InvalidJson)` - JSONとして解釈できない
/// * `Err(Error::InvalidAnalysis)` - オブジェクトでない、語彙外の値、信頼度が数値でないか範囲外
pub fn parse_analysis_response(response: &str) -> Result<ParsedAnalysis> {
    let cleaned = strip_code_fences(response);
    let raw: Value = serde_json::from_str(&cleaned).map_err(Error::InvalidJson)?;

    if !raw.is_object() {
        return Err(Error::InvalidAnalysis("expected a JSON object".into()));
    }

    // 語彙外は丸めずに弾く
    check_vocabulary(&raw, "severity", Severity::ALL)?;
    check_vocabulary(&raw, "priority_level", PriorityLevel::ALL)?;

    let result = AnalysisResult::deserialize(&raw)
        .map_err(|e| Error::InvalidAnalysis(e.to_string()))?;

    if let Some(score) = result.ai_confidence_score {
        if !(0.0..=1.0).contains(&score) {
            return Err(Error::InvalidAnalysis(format!(
                "ai_confidence_score {} is outside 0..=1",
                score
            )));
        }
    }

    Ok(ParsedAnalysis { result, raw })
}

fn check_vocabulary(raw: &Value, key: &str, allowed: &[&str]) -> Result<()> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => Ok(()),
        Some(other) => Err(Error::InvalidAnalysis(format!(
            "{} {} is not one of {}",
            key,
            other,
            allowed.join(", ")
        ))),
    }
}
