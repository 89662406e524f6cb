//! 埋め込み取得モジュール
//!
//! テキストを固定サイズのバッチに分けてプロバイダに投げ、
//! 入力順どおりに連結した単位ベクトルを返す。

mod cohere;
mod openai;
mod provider;

pub use cohere::CohereProvider;
pub use openai::OpenAiProvider;
pub use provider::EmbeddingProvider;

use crate::ai_provider::EmbeddingProviderKind;
use crate::error::{PriceMatchError, ProviderError, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use price_match_common::{l2_normalize, Embedding};
use std::time::Duration;

/// プロバイダを生成（APIキーは明示的に渡す）
pub fn build_provider(
    kind: EmbeddingProviderKind,
    api_key: String,
    model: String,
    base_url: &str,
    timeout: Duration,
) -> Result<Box<dyn EmbeddingProvider>> {
    Ok(match kind {
        EmbeddingProviderKind::OpenAi => {
            Box::new(OpenAiProvider::new(api_key, model, base_url, timeout)?)
        }
        EmbeddingProviderKind::Cohere => {
            Box::new(CohereProvider::new(api_key, model, base_url, timeout)?)
        }
    })
}

/// バッチ分割して埋め込みを取得するクライアント
pub struct EmbeddingClient {
    provider: Box<dyn EmbeddingProvider>,
    batch_size: usize,
    concurrency: usize,
}

impl EmbeddingClient {
    pub fn new(provider: Box<dyn EmbeddingProvider>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(PriceMatchError::Config("batch_size は1以上を指定してください".into()));
        }
        Ok(Self {
            provider,
            batch_size,
            concurrency: 1,
        })
    }

    /// 同時に処理するバッチ数（結果の順序は入力順のまま）
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// テキスト列を単位ベクトル列に変換
    ///
    /// 最初に失敗したバッチで全体を中断する。
    pub async fn embed(&self, texts: &[String], log: &dyn Fn(&str)) -> Result<Vec<Embedding>> {
        let total = texts.len().div_ceil(self.batch_size);

        let batches = texts
            .chunks(self.batch_size)
            .enumerate()
            .map(|(idx, batch)| self.embed_one(idx + 1, total, batch, log));

        let per_batch: Vec<Vec<Embedding>> = stream::iter(batches)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut vectors: Vec<Embedding> = per_batch.into_iter().flatten().collect();
        for vector in vectors.iter_mut() {
            l2_normalize(vector);
        }
        Ok(vectors)
    }

    async fn embed_one(
        &self,
        batch_no: usize,
        total: usize,
        batch: &[String],
        log: &dyn Fn(&str),
    ) -> Result<Vec<Embedding>> {
        log(&format!(
            "Requesting batch {}/{} ({} texts) from {}...",
            batch_no,
            total,
            batch.len(),
            self.provider.model_name()
        ));

        let vectors = self
            .provider
            .embed_batch(batch)
            .await
            .map_err(|source| PriceMatchError::Provider {
                batch: batch_no,
                source,
            })?;

        if vectors.len() != batch.len() {
            return Err(PriceMatchError::Provider {
                batch: batch_no,
                source: ProviderError::CountMismatch {
                    expected: batch.len(),
                    actual: vectors.len(),
                },
            });
        }

        log(&format!("Received embeddings for batch {}/{}.", batch_no, total));
        Ok(vectors)
    }
}
