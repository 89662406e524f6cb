use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Cohere,
}

impl EmbeddingProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingProviderKind::OpenAi => "openai",
            EmbeddingProviderKind::Cohere => "cohere",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingProviderKind::OpenAi => "text-embedding-3-large",
            EmbeddingProviderKind::Cohere => "embed-english-v3.0",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            EmbeddingProviderKind::OpenAi => "https://api.openai.com/v1",
            EmbeddingProviderKind::Cohere => "https://api.cohere.ai/v1",
        }
    }

    /// APIキーを読む環境変数
    pub fn api_key_env(&self) -> &'static str {
        match self {
            EmbeddingProviderKind::OpenAi => "OPENAI_API_KEY",
            EmbeddingProviderKind::Cohere => "COHERE_API_KEY",
        }
    }
}
