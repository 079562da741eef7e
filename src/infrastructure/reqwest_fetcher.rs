// reqwest-backed implementation of the HTTP port
use crate::application::http_fetcher::{HttpFetcher, HttpResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::redirect::Policy;

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Redirects are not followed: artwork redirects lead to animated GIFs
    /// that can be very large, so a redirect counts as a failed fetch.
    /// No request timeout is set.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(HttpResponse::new(status, body))
    }
}
