use civic_ai_common::{PERMISSIVE_SYSTEM_PROMPT, VALIDATING_SYSTEM_PROMPT};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 解析モード（デプロイ時に選択）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// 市民通報として妥当かも判定する
    #[default]
    Validating,
    /// 判定せず全通報を有効扱い
    Permissive,
}

impl AnalyzerMode {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AnalyzerMode::Validating => VALIDATING_SYSTEM_PROMPT,
            AnalyzerMode::Permissive => PERMISSIVE_SYSTEM_PROMPT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerMode::Validating => "validating",
            AnalyzerMode::Permissive => "permissive",
        }
    }
}

impl fmt::Display for AnalyzerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_validating() {
        assert_eq!(AnalyzerMode::default(), AnalyzerMode::Validating);
    }

    #[test]
    fn test_system_prompt_per_mode() {
        assert!(AnalyzerMode::Validating.system_prompt().contains("is_valid_civic_issue"));
        assert!(!AnalyzerMode::Permissive.system_prompt().contains("is_valid_civic_issue"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AnalyzerMode::Permissive).unwrap();
        assert_eq!(json, "\"permissive\"");

        let mode: AnalyzerMode = serde_json::from_str("\"validating\"").unwrap();
        assert_eq!(mode, AnalyzerMode::Validating);
    }

    #[test]
    fn test_value_enum_parse() {
        let mode = AnalyzerMode::from_str("permissive", true).unwrap();
        assert_eq!(mode, AnalyzerMode::Permissive);
        assert!(AnalyzerMode::from_str("strict", true).is_err());
    }
}
