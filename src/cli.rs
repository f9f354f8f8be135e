use crate::mode::AnalyzerMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "civic-ai")]
#[command(about = "市民通報AI解析プロキシ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 解析プロキシサーバを起動
    Serve {
        /// 待ち受けアドレス
        #[arg(long)]
        bind: Option<String>,

        /// 待ち受けポート
        #[arg(short, long)]
        port: Option<u16>,

        /// 解析モード (validating/permissive)
        #[arg(short, long)]
        mode: Option<AnalyzerMode>,

        /// チャット補完エンドポイント
        #[arg(long)]
        gateway_url: Option<String>,

        /// モデルID
        #[arg(long)]
        model: Option<String>,
    },

    /// 通報を1件だけ解析してJSONを出力
    Analyze {
        /// 説明文
        #[arg(short, long)]
        description: Option<String>,

        /// アップロード済み画像のURL
        #[arg(long, conflicts_with = "image_file")]
        image_url: Option<String>,

        /// ローカル画像ファイル（data URLとして送信）
        #[arg(short, long)]
        image_file: Option<PathBuf>,

        /// 位置情報JSON（例: '{"lat":12.97,"lng":77.59}'）
        #[arg(short, long)]
        location: Option<String>,

        /// 解析モード (validating/permissive)
        #[arg(short, long)]
        mode: Option<AnalyzerMode>,

        /// 出力JSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// APIキーを対話入力（非表示）
        #[arg(long, conflicts_with = "set_api_key")]
        prompt_api_key: bool,

        /// チャット補完エンドポイントを設定
        #[arg(long)]
        set_gateway_url: Option<String>,

        /// モデルIDを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
