use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use manup_host::{MetadataSource, PolicyMetadata, SourceError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves the policy document with a plain `GET` of a JSON URL.
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpMetadataSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self) -> Result<PolicyMetadata, SourceError> {
        if self.url.is_empty() {
            return Err(SourceError::NotConfigured);
        }

        debug!("Fetching update policy from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(SourceError::request_from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(SourceError::HttpStatus {
                status,
                body_snippet,
            });
        }

        let body = response.text().await.map_err(SourceError::request_from)?;
        serde_json::from_str(&body).map_err(SourceError::parse_from)
    }
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
