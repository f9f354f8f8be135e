use crate::error::{CivicAiError, Result};
use crate::mode::AnalyzerMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";
/// 既存デプロイで使われている変数名
pub const LEGACY_API_KEY_ENV: &str = "LOVABLE_API_KEY";
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    pub mode: AnalyzerMode,
    pub bind_address: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway_url: DEFAULT_GATEWAY_URL.into(),
            model: DEFAULT_MODEL.into(),
            mode: AnalyzerMode::Validating,
            bind_address: "0.0.0.0".into(),
            port: 8787,
            max_body_bytes: 10 * 1024 * 1024, // data URL画像を許容
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読めない・壊れている場合は警告してデフォルト
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CivicAiError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("civic-ai").join("config.json"))
    }

    /// APIキー（環境変数を優先、空文字は未設定扱い）
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::pick_api_key([
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(LEGACY_API_KEY_ENV).ok(),
            self.api_key.clone(),
        ])
    }

    /// 先頭から最初の空でないキー
    fn pick_api_key<I>(candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        candidates.into_iter().flatten().find(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, path: &Path, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save_to(path)
    }
}
