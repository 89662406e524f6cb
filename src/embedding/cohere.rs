//! Cohere Embed API

use super::provider::EmbeddingProvider;
use crate::error::{PriceMatchError, ProviderError, Result};
use async_trait::async_trait;
use price_match_common::Embedding;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 単価表・照会のどちらも文書として埋め込む
const INPUT_TYPE: &str = "search_document";

pub struct CohereProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
    input_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Option<Vec<Embedding>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

impl CohereProvider {
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
impl EmbeddingProvider for CohereProvider {
    async fn embed_batch(&self, texts: &[String]) -> std::result::Result<Vec<Embedding>, ProviderError> {
        let url = format!("{}/embed", self.base_url);
        tracing::debug!(%url, model = %self.model, count = texts.len(), "cohere embed request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                texts,
                input_type: INPUT_TYPE,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!(status, "cohere embed response");
        let body = response.text().await?;
        parse_response(status, &body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// レスポンス本文を解釈する（2xx 以外は本文の message をエラーに含める）
fn parse_response(status: u16, body: &str) -> std::result::Result<Vec<Embedding>, ProviderError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(ProviderError::Status { status, message });
    }

    let body: EmbedResponse = serde_json::from_str(body)?;
    body.embeddings.ok_or(ProviderError::MissingData)
}
