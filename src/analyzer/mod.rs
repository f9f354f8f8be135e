//! 市民通報のAI解析
//!
//! 1リクエストにつきゲートウェイ呼び出しは1回だけ。
//! 状態は持たないので `Arc<Analyzer>` を並行に共有してよい。

mod gateway;
pub mod image_file;

pub use gateway::{translate_status, ChatMessage, ChatRequest, ChatRole, MessageContent};

use crate::config::Config;
use crate::error::{CivicAiError, Result};
use crate::mode::AnalyzerMode;
use civic_ai_common::{build_user_content, parse_analysis_response, AnalysisRequest, ParsedAnalysis};
use tracing::{debug, error, info};

/// 解析器の設定（起動時に注入）
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    pub mode: AnalyzerMode,
}

impl AnalyzerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.resolve_api_key(),
            gateway_url: config.gateway_url.clone(),
            model: config.model.clone(),
            mode: config.mode,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    client: reqwest::Client,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn mode(&self) -> AnalyzerMode {
        self.config.mode
    }

    /// チャット補完リクエストを組み立て（システム → ユーザーの2ターン）
    pub fn build_chat_request(&self, request: &AnalysisRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: MessageContent::Text(self.config.mode.system_prompt().to_string()),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: MessageContent::Parts(build_user_content(request)),
                },
            ],
        }
    }

    /// 通報を解析
    ///
    /// APIキーが無ければネットワークに出る前にエラー
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ParsedAnalysis> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CivicAiError::MissingApiKey)?;

        info!(mode = %self.config.mode, "Starting AI analysis for civic issue");

        let body = self.build_chat_request(request);
        debug!(segments = body.user_parts().len(), "Calling AI Gateway");

        let content = gateway::complete(&self.client, &self.config.gateway_url, api_key, &body).await?;
        debug!(response = %content, "AI response");

        let parsed = parse_analysis_response(&content).inspect_err(|e| {
            error!(error = %e, response = %content, "Failed to parse AI response");
        })?;

        info!(
            category = parsed.result.issue_category.as_deref().unwrap_or("-"),
            valid = parsed.result.is_valid(),
            "Analysis complete"
        );
        Ok(parsed)
    }
}
