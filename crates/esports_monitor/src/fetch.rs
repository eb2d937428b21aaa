//! Page fetching for the scrape adapters.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Browser UA; the betting sites block obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A fetched page. Non-2xx responses are returned, not raised: to the
/// adapters an error page is just a page without matches.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Transport failures (DNS, connect, timeout, body read) are errors.
    async fn fetch(&self, url: &str) -> Result<Page>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".parse()?,
        );
        headers.insert(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5".parse()?);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()
            .context("failed to build scrape HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed for {}", url))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("body read failed for {}", url))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(Page { url: url.to_string(), status, body })
    }
}
