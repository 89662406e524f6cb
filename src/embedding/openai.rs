//! OpenAI Embeddings API

use super::provider::EmbeddingProvider;
use crate::error::{PriceMatchError, ProviderError, Result};
use async_trait::async_trait;
use price_match_common::Embedding;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Option<Vec<EmbeddingItem>>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Embedding,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceMatchError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed_batch(&self, texts: &[String]) -> std::result::Result<Vec<Embedding>, ProviderError> {
        let url = format!("{}/embeddings", self.base_url);
        tracing::debug!(%url, model = %self.model, count = texts.len(), "openai embeddings request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!(status, "openai embeddings response");
        let body = response.text().await?;
        parse_response(status, &body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// レスポンス本文を解釈する（`data[].index` 順に並べ直す）
fn parse_response(status: u16, body: &str) -> std::result::Result<Vec<Embedding>, ProviderError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(ProviderError::Status { status, message });
    }

    let body: EmbeddingResponse = serde_json::from_str(body)?;
    let mut data = body.data.ok_or(ProviderError::MissingData)?;
    data.sort_by_key(|item| item.index);
    Ok(data.into_iter().map(|item| item.embedding).collect())
}
