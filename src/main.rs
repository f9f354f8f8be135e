use anyhow::Context;
use civic_ai_common::{AnalysisRequest, AnalysisResult};
use civic_issue_ai::analyzer::{image_file, Analyzer, AnalyzerConfig};
use civic_issue_ai::{cli, config, server};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::ProgressBar;
use server::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Serve { bind, port, mode, gateway_url, model } => {
            let mut config = Config::load()?;
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(url) = gateway_url {
                config.gateway_url = url;
            }
            if let Some(model) = model {
                config.model = model;
            }

            let analyzer = Arc::new(Analyzer::new(AnalyzerConfig::from_config(&config))?);
            server::serve(analyzer, ServerConfig::from_config(&config)).await?;
        }

        Commands::Analyze { description, image_url, image_file, location, mode, output } => {
            println!("📸 civic-ai - 通報解析\n");

            // ローカル画像はdata URLにして送る
            let image_url = match image_file {
                Some(path) => Some(image_file::to_data_url(&path)?),
                None => image_url,
            };

            let location_data = location
                .map(|l| serde_json::from_str::<serde_json::Value>(&l))
                .transpose()
                .context("--location must be JSON")?;

            let request = AnalysisRequest { image_url, description, location_data };
            if !request.has_evidence() {
                println!("⚠ 画像も説明文もありません。このまま送信します");
            }

            let config = Config::load()?;
            let mut analyzer_config = AnalyzerConfig::from_config(&config);
            if let Some(mode) = mode {
                analyzer_config.mode = mode;
            }
            let analyzer = Analyzer::new(analyzer_config)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("AI解析中...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = analyzer.analyze(&request).await;
            spinner.finish_and_clear();

            let parsed = result?;
            print_summary(&parsed.result);

            let json = serde_json::to_string_pretty(&parsed.raw)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ 結果を保存: {}", path.display());
                }
                None => println!("\n{}", json),
            }
        }

        Commands::Config { set_api_key, prompt_api_key, set_gateway_url, set_model, show } => {
            // 壊れた設定ファイルでも上書きできるように
            let path = Config::config_path()?;
            let mut config = Config::load_or_default(&path);

            let key = if prompt_api_key {
                Some(
                    dialoguer::Password::new()
                        .with_prompt("APIキー")
                        .interact()
                        .context("failed to read API key")?,
                )
            } else {
                set_api_key
            };

            if let Some(key) = key {
                config.set_api_key(&path, key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(url) = set_gateway_url {
                config.gateway_url = url;
                config.save_to(&path)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(model) = set_model {
                config.model = model;
                config.save_to(&path)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定: {}", path.display());
                println!("  エンドポイント: {}", config.gateway_url);
                println!("  モデル: {}", config.model);
                println!("  モード: {}", config.mode);
                println!("  待ち受け: {}:{}", config.bind_address, config.port);
                println!("  最大ボディ: {} bytes", config.max_body_bytes);
                println!(
                    "  APIキー: {}",
                    if config.resolve_api_key().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    if result.is_valid() {
        println!("✔ 解析完了");
    } else {
        println!("✖ 市民通報として認識されませんでした");
    }
    if let Some(message) = &result.validation_message {
        println!("  {}", message);
    }
    println!("  カテゴリ: {}", text(&result.issue_category));
    println!(
        "  深刻度: {} / 優先度: {}",
        result.severity.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
        result.priority_level.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
    );
    println!("  担当部署: {}", text(&result.suggested_department));
    println!("  対応目安: {}", text(&result.estimated_resolution_time));
    println!("  推奨対応: {}", text(&result.recommended_action));
    if let Some(score) = result.ai_confidence_score {
        println!("  信頼度: {:.0}%", score * 100.0);
    }
}
