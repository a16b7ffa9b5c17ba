use crate::errors::AppError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// HTTP client with a per-request timeout.
///
/// Requests are attempted exactly once; callers decide how to degrade.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Fetch and decode a JSON document
    #[instrument(skip(self, url), fields(url = %redact(url)))]
    pub async fn get_json<T>(&self, url: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let text = self.get_text(url).await?;
        let json: T = serde_json::from_str(&text).map_err(AppError::ParseError)?;
        Ok(json)
    }

    /// Fetch the raw body of a successful response
    pub async fn get_text(&self, url: &str) -> Result<String, AppError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| AppError::timeout(format!("Request to {} timed out", redact(url))))?
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout(format!("Request to {} timed out", redact(url)))
                } else {
                    AppError::NetworkError(e.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %redact(url), status = status.as_u16(), "Upstream returned an error status");
            return Err(AppError::http(
                status.as_u16(),
                format!("HTTP error: {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::NetworkError(e.without_url()))?;
        info!(url = %redact(url), bytes = text.len(), "Request successful");

        Ok(text)
    }
}

/// Strips the query string so credentials never reach the logs
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
