use crate::error::ProviderError;
use async_trait::async_trait;
use price_match_common::Embedding;

/// 埋め込みプロバイダ
///
/// 1回の呼び出しで1バッチ分のテキストを受け取り、入力と同じ順序でベクトルを返す。
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, ProviderError>;

    /// モデル名（例: "text-embedding-3-large"）
    fn model_name(&self) -> &str;
}
