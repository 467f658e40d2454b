//! Shared HTTP plumbing for OpenAI-compatible endpoints.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authenticated JSON client with bounded retries.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client,
    config: ProviderConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl ApiClient {
    pub(crate) fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| ProviderError::invalid_config("API key is not a valid header value"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub(crate) fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// POSTs `body` to `endpoint` and decodes the JSON response.
    ///
    /// Retryable failures are attempted up to `max_retries` times in total.
    pub(crate) async fn post_json<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.config.endpoint(endpoint);
        let mut attempt = 0usize;
        loop {
            match self.post_once(&url, body).await {
                Ok(resp) => return Ok(resp),
                Err(err) if err.is_retryable() && attempt + 1 < self.config.max_retries => {
                    attempt += 1;
                    let backoff = retry_backoff(attempt);
                    tracing::warn!(
                        "Request to {} failed ({}), retrying in {:?} (attempt {}/{})",
                        url,
                        err,
                        backoff,
                        attempt + 1,
                        self.config.max_retries
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn post_once<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status { status, body: text });
        }
        serde_json::from_str(&text).map_err(|source| ProviderError::Decode { source })
    }
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(250 * (1 << capped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(retry_backoff(1), Duration::from_millis(500));
        assert_eq!(retry_backoff(5), retry_backoff(50));
    }

    #[test]
    fn test_new_rejects_missing_key() {
        let err = ApiClient::new(ProviderConfig::new("")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
    }
}
