use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use qa_dataset::{DispatchConfig, GenerationConfig, RetryPolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub folder_id: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub workers: usize,
    pub retry_attempts: u32,
}

/// Credentials for the remote model, required by the stages that call it
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub folder_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_key: env::var("YANDEX_API_KEY").ok().filter(|v| !v.is_empty()),
            folder_id: env::var("YANDEX_FOLDER_ID").ok().filter(|v| !v.is_empty()),
            model: env::var("QA_MODEL").unwrap_or_else(|_| "yandexgpt-lite".to_string()),
            temperature: env::var("QA_TEMPERATURE")
                .unwrap_or_else(|_| "0.3".to_string())
                .parse()
                .context("QA_TEMPERATURE must be a number")?,
            max_tokens: env::var("QA_MAX_TOKENS")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .context("QA_MAX_TOKENS must be a positive integer")?,
            workers: env::var("QA_WORKERS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("QA_WORKERS must be a positive integer")?,
            retry_attempts: env::var("QA_RETRY_ATTEMPTS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("QA_RETRY_ATTEMPTS must be a non-negative integer")?,
        })
    }

    /// Credentials, or a startup error naming the missing variable
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            api_key: self
                .api_key
                .clone()
                .context("YANDEX_API_KEY must be set")?,
            folder_id: self
                .folder_id
                .clone()
                .context("YANDEX_FOLDER_ID must be set")?,
        })
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig::new()
            .with_model(&self.model)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig::default()
            .with_workers(self.workers)
            .with_retry(RetryPolicy::new(self.retry_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_key: None,
            folder_id: Some("b1g".into()),
            model: "yandexgpt".into(),
            temperature: 0.1,
            max_tokens: 256,
            workers: 4,
            retry_attempts: 5,
        }
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = config().credentials().unwrap_err();
        assert!(err.to_string().contains("YANDEX_API_KEY"));
    }

    #[test]
    fn test_derived_library_configs() {
        let config = config();
        let generation = config.generation();
        assert_eq!(generation.model, "yandexgpt");
        assert_eq!(generation.max_tokens, 256);

        let dispatch = config.dispatch();
        assert_eq!(dispatch.workers, 4);
        assert_eq!(dispatch.retry.max_attempts(), 6);
    }
}
