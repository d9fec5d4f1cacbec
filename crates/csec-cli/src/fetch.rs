//! HTTP implementation of the page fetcher.

use std::time::Duration;

use tracing::debug;

use csec_core::models::config::CrawlConfig;
use csec_core::{FetchError, PageFetcher};

/// Fetches pages and reports over HTTP with per-kind timeouts.
pub struct HttpFetcher {
    client: reqwest::Client,
    page_timeout: Duration,
    pdf_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            pdf_timeout: Duration::from_secs(config.pdf_timeout_secs),
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, self.page_timeout).await?;
        response.text().await.map_err(|e| transport_error(url, e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url, self.pdf_timeout).await?;
        let bytes = response.bytes().await.map_err(|e| transport_error(url, e))?;
        debug!("downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
