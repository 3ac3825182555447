use std::time::Duration;

use async_trait::async_trait;
use reqwest;
use tracing::info;

use crate::config::validate_feed_url;
use crate::errors::CheckError;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, CheckError>;
}

pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CheckError> {
        validate_feed_url(url)?;
        info!(url, "downloading calendar feed");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CheckError::Fetch(format!("request timed out: {}", e))
            } else {
                CheckError::Fetch(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Fetch(format!(
                "feed request failed with status {}",
                status
            )));
        }
        response
            .text()
            .await
            .map_err(|e| CheckError::Fetch(format!("failed to read feed body: {}", e)))
    }
}
