use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::retry::RetryConfig;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// When set, render endpoints require a matching `x-api-key` header.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_fetch_timeout_seconds")]
    pub template_fetch_timeout_seconds: u64,

    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_server_port() -> u16 {
    8095
}

fn default_fetch_timeout_seconds() -> u64 {
    10
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_initial_retry_delay_ms() -> u64 {
    100
}

fn default_max_retry_delay_ms() -> u64 {
    2000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: default_server_port(),
            api_key: None,
            log_format: LogFormat::default(),
            template_fetch_timeout_seconds: default_fetch_timeout_seconds(),
            max_retry_attempts: default_max_retry_attempts(),
            initial_retry_delay_ms: default_initial_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            retry_backoff_multiplier: default_retry_backoff_multiplier(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retry_attempts,
            initial_delay_ms: self.initial_retry_delay_ms,
            max_delay_ms: self.max_retry_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}
