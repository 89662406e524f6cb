use crate::ai_provider::EmbeddingProviderKind;
use crate::error::{PriceMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 埋め込みモデル名を上書きする環境変数
pub const MODEL_ENV: &str = "OPENAI_EMBEDDING_MODEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub provider: EmbeddingProviderKind,
    /// 未設定ならプロバイダのデフォルトモデル
    pub model: Option<String>,
    pub batch_size: usize,
    /// 同時に投げるバッチ数
    pub concurrency: usize,
    pub timeout_seconds: u64,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: EmbeddingProviderKind::OpenAi,
            model: None,
            batch_size: 100,
            concurrency: 1,
            timeout_seconds: 60,
            base_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PriceMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("price-match").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PriceMatchError::Config("batch_size は1以上を指定してください".into()));
        }
        if self.concurrency == 0 {
            return Err(PriceMatchError::Config("concurrency は1以上を指定してください".into()));
        }
        Ok(())
    }

    /// 使用するモデル名（環境変数 > 設定 > プロバイダのデフォルト）
    pub fn model_for(&self, provider: EmbeddingProviderKind) -> String {
        if let Ok(model) = std::env::var(MODEL_ENV) {
            if !model.trim().is_empty() && provider == EmbeddingProviderKind::OpenAi {
                return model.trim().to_string();
            }
        }
        self.model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    pub fn base_url_for(&self, provider: EmbeddingProviderKind) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    pub fn get_api_key(&self, provider: EmbeddingProviderKind) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(provider.api_key_env()) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(PriceMatchError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.provider, EmbeddingProviderKind::OpenAi);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = Config {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PriceMatchError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"provider": "cohere", "batch_size": 5}"#).unwrap();
        assert_eq!(config.provider, EmbeddingProviderKind::Cohere);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.base_url_for(config.provider), "https://api.cohere.ai/v1");
    }

    #[test]
    fn test_stored_model_overrides_provider_default() {
        let config = Config {
            model: Some("embed-multilingual-v3.0".into()),
            ..Default::default()
        };
        assert_eq!(config.model_for(EmbeddingProviderKind::Cohere), "embed-multilingual-v3.0");
    }
}
