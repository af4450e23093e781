use crate::errors::fetch_context;
use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// HTTP client with built-in rate limiting
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// GET a JSON document; `None` when the resource does not exist
    pub async fn get_json(&mut self, url: &str) -> Result<Option<Value>> {
        self.rate_limiter.wait().await;
        let response = self.send_get_request(url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Not found: {}", url);
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("API returned status {} for {}", response.status(), url);
        }

        let value = response
            .json::<Value>()
            .await
            .with_context(|| format!("Invalid JSON from {}", url))?;
        Ok(Some(value))
    }

    pub fn requests_made(&self) -> usize {
        self.rate_limiter.request_count()
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| fetch_context(url))
    }
}
