use std::fmt;
use thiserror::Error;

/// どちらのワークブックに関するエラーか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookSide {
    Pricelist,
    Inquiry,
}

impl fmt::Display for WorkbookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbookSide::Pricelist => write!(f, "pricelist"),
            WorkbookSide::Inquiry => write!(f, "inquiry"),
        }
    }
}

/// 埋め込みプロバイダ呼び出しの失敗理由
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response missing embedding data")]
    MissingData,

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum PriceMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`price-match config --set-api-key YOUR_KEY` または --api-key で指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("Failed to open {side} file: {source}")]
    Load {
        side: WorkbookSide,
        #[source]
        source: calamine::Error,
    },

    #[error("No item descriptions with rates found in pricelist file.")]
    EmptyPricelist,

    #[error("No inquiry items with empty rates found in the inquiry file.")]
    EmptyInquiry,

    #[error("Embedding API call failed (batch {batch}): {source}")]
    Provider {
        batch: usize,
        #[source]
        source: ProviderError,
    },

    #[error("入力が不正: {0}")]
    InvalidInput(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] price_match_common::Error),
}

pub type Result<T> = std::result::Result<T, PriceMatchError>;
