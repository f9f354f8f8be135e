//! ローカル画像をdata URLへ変換（CLIの --image-file 用）

use crate::error::{CivicAiError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// 拡張子からMIMEタイプを推定（不明ならimage/jpeg）
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}

/// 画像ファイルを `data:<mime>;base64,<data>` 形式に変換
pub fn to_data_url(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CivicAiError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    Ok(format!("data:{};base64,{}", mime_type_for(path), STANDARD.encode(bytes)))
}
