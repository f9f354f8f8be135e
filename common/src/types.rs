//! 解析リクエスト/結果の型定義
//!
//! プロキシサーバとCLIで共有される型:
//! - AnalysisRequest: 通報画面から届く入力
//! - AnalysisResult: AIが返す分類結果（語彙チェック済み）
//! - ContentPart: チャット補完APIへ送るユーザーターンの要素

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 通報画面からの解析リクエスト
///
/// どのフィールドも省略可能。`null` は未指定として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    /// アップロード済み画像のURL（data URLも可）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// 市民が入力した説明文
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 位置情報（形は任意。通常は {lat, lng, address}）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_data: Option<Value>,
}

impl AnalysisRequest {
    /// 空でない説明文
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// 空でない画像URL
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }

    /// 位置情報
    ///
    /// `null` / `false` / `0` / `""` は付いていないものとして扱う
    pub fn location(&self) -> Option<&Value> {
        self.location_data.as_ref().filter(|v| is_truthy(v))
    }

    /// 画像か説明文のどちらかがあるか
    ///
    /// プロキシ自体はこれを強制しない（呼び出し側の責任）
    pub fn has_evidence(&self) -> bool {
        self.description_text().is_some() || self.image().is_some()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 深刻度（閉じた語彙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Critical,
}

impl Severity {
    pub const ALL: &'static [&'static str] = &["minor", "moderate", "critical"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 優先度（閉じた語彙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub const ALL: &'static [&'static str] = &["low", "medium", "high"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI解析結果
///
/// 全フィールド省略可能。未知のキーは `extra` に保持し、落とさない。
/// 型が厳密なのは `severity` / `priority_level` / `ai_confidence_score` だけで、
/// 自由記述系のフィールドは型が違えば `None` になる（元のJSONはそのまま返す）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_valid_civic_issue: Option<bool>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub issue_category: Option<String>,     // 例: pothole, garbage overflow

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<PriorityLevel>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub suggested_department: Option<String>, // 自由記述の部署名

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub context_analysis: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub estimated_resolution_time: Option<String>, // 構造化されていない期間表記

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_confidence_score: Option<f64>,   // 0.0〜1.0

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub detected_objects: Option<Vec<String>>,

    /// モデルが追加で返したキー
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 型が合わなければ None
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl AnalysisResult {
    /// 市民通報として有効か
    ///
    /// 検証なしモードではフィールド自体が無いので有効とみなす
    pub fn is_valid(&self) -> bool {
        self.is_valid_civic_issue.unwrap_or(true)
    }
}

/// チャット補完APIのユーザーターン要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// エラーレスポンス本体 `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // AnalysisRequest テスト
    // =============================================

    #[test]
    fn test_request_deserialize_camel_case() {
        let json = r#"{
            "imageUrl": "https://storage.example/issue.jpg",
            "description": "large pothole",
            "locationData": {"lat": 12.97, "lng": 77.59, "address": "MG Road"}
        }"#;

        let req: AnalysisRequest = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(req.image_url.as_deref(), Some("https://storage.example/issue.jpg"));
        assert_eq!(req.description.as_deref(), Some("large pothole"));
        assert_eq!(req.location_data.unwrap()["address"], "MG Road");
    }

    #[test]
    fn test_request_empty_object() {
        let req: AnalysisRequest = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert_eq!(req, AnalysisRequest::default());
        assert!(!req.has_evidence());
    }

    #[test]
    fn test_request_null_fields_are_absent() {
        let json = r#"{"imageUrl": null, "description": null, "locationData": null}"#;

        let req: AnalysisRequest = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(req.image_url.is_none());
        assert!(req.description.is_none());
        assert!(req.location_data.is_none());
    }

    #[test]
    fn test_request_falsy_location_is_absent() {
        for falsy in [r#""""#, "false", "0", "0.0"] {
            let json = format!(r#"{{"locationData": {}}}"#, falsy);
            let req: AnalysisRequest = serde_json::from_str(&json).expect("デシリアライズ失敗");
            assert!(req.location().is_none(), "{} should be absent", falsy);
        }

        // 空のオブジェクト・配列は付いている扱い
        for present in ["{}", "[]", "true", "1", r#""Dadar""#] {
            let json = format!(r#"{{"locationData": {}}}"#, present);
            let req: AnalysisRequest = serde_json::from_str(&json).expect("デシリアライズ失敗");
            assert!(req.location().is_some(), "{} should be present", present);
        }
    }

    #[test]
    fn test_request_empty_strings_are_not_evidence() {
        let req = AnalysisRequest {
            image_url: Some(String::new()),
            description: Some(String::new()),
            location_data: None,
        };
        assert!(req.image().is_none());
        assert!(req.description_text().is_none());
        assert!(!req.has_evidence());
    }

    // =============================================
    // 語彙 テスト
    // =============================================

    #[test]
    fn test_severity_vocabulary() {
        let s: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(s, Severity::Critical);
        assert_eq!(s.to_string(), "critical");
        assert!(Severity::ALL.contains(&s.as_str()));

        // 大文字や同義語は受け付けない
        assert!(serde_json::from_str::<Severity>("\"Critical\"").is_err());
        assert!(serde_json::from_str::<Severity>("\"severe\"").is_err());
    }

    #[test]
    fn test_priority_vocabulary() {
        let p: PriorityLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(p, PriorityLevel::Medium);
        assert_eq!(PriorityLevel::ALL, &["low", "medium", "high"]);
        assert!(serde_json::from_str::<PriorityLevel>("\"urgent\"").is_err());
    }

    // =============================================
    // AnalysisResult テスト
    // =============================================

    #[test]
    fn test_result_keeps_unknown_keys() {
        let json = r#"{"issue_category": "graffiti", "ward_number": 42}"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.issue_category.as_deref(), Some("graffiti"));
        assert_eq!(result.extra["ward_number"], 42);

        let out = serde_json::to_value(&result).unwrap();
        assert_eq!(out["ward_number"], 42);
    }

    #[test]
    fn test_result_free_text_type_mismatch_is_none() {
        let json = r#"{"severity": "minor", "estimated_resolution_time": 3, "detected_objects": "cone"}"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.severity, Some(Severity::Minor));
        assert!(result.estimated_resolution_time.is_none());
        assert!(result.detected_objects.is_none());
    }

    #[test]
    fn test_result_strict_fields_still_fail() {
        assert!(serde_json::from_str::<AnalysisResult>(r#"{"ai_confidence_score": "high"}"#).is_err());
        assert!(serde_json::from_str::<AnalysisResult>(r#"{"severity": 2}"#).is_err());
    }

    #[test]
    fn test_result_skips_absent_fields() {
        let result = AnalysisResult {
            severity: Some(Severity::Minor),
            ..Default::default()
        };

        let json = serde_json::to_string(&result).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"severity":"minor"}"#);
    }

    #[test]
    fn test_result_is_valid_defaults_to_true() {
        assert!(AnalysisResult::default().is_valid());

        let rejected = AnalysisResult {
            is_valid_civic_issue: Some(false),
            ..Default::default()
        };
        assert!(!rejected.is_valid());
    }

    // =============================================
    // ContentPart テスト
    // =============================================

    #[test]
    fn test_content_part_wire_shape() {
        let text = serde_json::to_value(ContentPart::text("User description: x")).unwrap();
        assert_eq!(text["type"], "text");
        assert_eq!(text["text"], "User description: x");

        let image = serde_json::to_value(ContentPart::image("https://img")).unwrap();
        assert_eq!(image["type"], "image_url");
        assert_eq!(image["image_url"]["url"], "https://img");
    }
}
