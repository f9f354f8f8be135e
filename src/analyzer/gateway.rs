//! AIゲートウェイ（OpenAI互換チャット補完）連携
//!
//! `{model, messages}` を1回だけPOSTし、`choices[0].message.content` を返す。
//! リトライ・タイムアウトは持たない（再送は呼び出し側の判断）。

use crate::error::{CivicAiError, Result};
use civic_ai_common::ContentPart;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// メッセージ本文（システムは文字列、ユーザーは要素配列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

/// チャット補完リクエスト（非ストリーミング）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// ユーザーターンの要素
    pub fn user_parts(&self) -> &[ContentPart] {
        self.messages
            .iter()
            .find(|m| m.role == ChatRole::User)
            .and_then(|m| match &m.content {
                MessageContent::Parts(parts) => Some(parts.as_slice()),
                MessageContent::Text(_) => None,
            })
            .unwrap_or(&[])
    }
}

/// チャット補完レスポンス
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

/// 上流ステータスをエラーに変換
///
/// 429/402 はそのまま呼び出し元へ、それ以外は汎用の上流障害
pub fn translate_status(status: StatusCode) -> CivicAiError {
    match status.as_u16() {
        429 => CivicAiError::RateLimited,
        402 => CivicAiError::CreditsExhausted,
        code => CivicAiError::Gateway(code),
    }
}

/// ゲートウェイ呼び出し
pub async fn complete(
    client: &Client,
    gateway_url: &str,
    api_key: &str,
    body: &ChatRequest,
) -> Result<String> {
    let response = client
        .post(gateway_url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %error_text, "AI Gateway error");
        return Err(translate_status(status));
    }

    let data: ChatResponse = response.json().await?;
    data.into_content().ok_or(CivicAiError::EmptyCompletion)
}
