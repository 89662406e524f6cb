use clap::{Parser, Subcommand};
use crate::ai_provider::EmbeddingProviderKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "price-match")]
#[command(about = "単価表と照会シートを意味類似度で照合し、単価を記入するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 単価表で照会シートの単価を埋めて出力
    Run {
        /// 単価表ファイル（.xlsx/.xlsm/.xls/.ods）
        #[arg(required = true)]
        pricelist: PathBuf,

        /// 照会ファイル
        #[arg(required = true)]
        inquiry: PathBuf,

        /// 出力フォルダ
        #[arg(short, long)]
        output: PathBuf,

        /// APIキー（未指定なら環境変数・設定ファイル）
        #[arg(long)]
        api_key: Option<String>,

        /// 埋め込みプロバイダ (openai/cohere)
        #[arg(long)]
        provider: Option<EmbeddingProviderKind>,

        /// 埋め込みモデル
        #[arg(short, long)]
        model: Option<String>,

        /// 1リクエストあたりのテキスト数
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// 同時リクエスト数
        #[arg(long)]
        concurrency: Option<usize>,

        /// 出力ファイルが既に存在しても確認しない
        #[arg(short, long)]
        yes: bool,

        /// 読込と走査のみ（APIは呼ばない）
        #[arg(long)]
        dry_run: bool,

        /// 照合結果をJSONで保存
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 設定管理
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// プロバイダを設定
        #[arg(long)]
        set_provider: Option<EmbeddingProviderKind>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// バッチサイズを設定
        #[arg(long)]
        set_batch_size: Option<usize>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
