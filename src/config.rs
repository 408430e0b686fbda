use std::time::Duration;

use serde::Deserialize;

use crate::services::text_generation::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Google Generative Language API key
    pub gemini_api_key: String,

    /// Generative Language API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Model used for outfit generation and preference checks
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Model used for trend reports
    #[serde(default = "default_trend_model")]
    pub trend_model: String,

    /// Attempts per text-generation call, including the first one
    #[serde(default = "default_llm_max_attempts")]
    pub llm_max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[serde(default = "default_llm_base_delay_ms")]
    pub llm_base_delay_ms: u64,

    /// Per-request timeout for upstream LLM calls
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// PostgreSQL connection URL. In-memory stores are used when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL for the trend cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_trend_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_llm_max_attempts() -> u32 {
    5
}

fn default_llm_base_delay_ms() -> u64 {
    1000
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Retry policy for the text-generation client
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.llm_max_attempts,
            Duration::from_millis(self.llm_base_delay_ms),
        )
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
