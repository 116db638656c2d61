use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::ServiceError,
    models::{retry::RetryConfig, template::TemplateSource},
    utils::retry_with_backoff,
};

/// Resolves a [`TemplateSource`] into template text.
#[derive(Clone)]
pub struct TemplateLoader {
    http_client: Client,
    retry_config: RetryConfig,
}

impl TemplateLoader {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.template_fetch_timeout_seconds))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!(
            timeout_seconds = config.template_fetch_timeout_seconds,
            max_retry_attempts = config.max_retry_attempts,
            "Template loader initialized"
        );

        Ok(Self {
            http_client,
            retry_config: config.retry_config(),
        })
    }

    pub async fn load(&self, source: &TemplateSource) -> Result<String, ServiceError> {
        match source {
            TemplateSource::Inline(text) => Ok(text.clone()),
            TemplateSource::Reference(location) if source.is_remote() => {
                self.fetch(location).await
            }
            TemplateSource::Reference(location) => Self::read_file(location).await,
        }
    }

    async fn read_file(location: &str) -> Result<String, ServiceError> {
        debug!(path = %location, "Reading template file");

        tokio::fs::read_to_string(location)
            .await
            .map_err(|source| ServiceError::TemplateRead {
                location: location.to_string(),
                source,
            })
    }

    async fn fetch(&self, url: &str) -> Result<String, ServiceError> {
        debug!(url, "Fetching template");

        retry_with_backoff(&self.retry_config, || {
            let client = self.http_client.clone();

            async move {
                let response = client.get(url).send().await.map_err(|e| e.to_string())?;

                let status = response.status();

                if status.is_success() {
                    response
                        .text()
                        .await
                        .map_err(|e| format!("Failed to read response body: {}", e))
                } else {
                    Err(format!("Upstream returned status {}", status))
                }
            }
        })
        .await
        .map_err(|reason| ServiceError::TemplateFetch {
            location: url.to_string(),
            reason,
        })
    }
}
