//! HTTP implementation of [`ProjectSource`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::error::{FetchError, FetchResult};
use super::query::BatchInput;
use super::{extract_page, ProjectSource, ProjectsPage};
use crate::config::ScrapeConfig;

/// Headers of a stock API client; the endpoint filters obvious bots.
const USER_AGENT: &str = "PostmanRuntime/7.43.0";
const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// cookie.fun tRPC client.
pub struct CookieClient {
    client: Client,
    api_url: String,
    page_limit: u32,
}

impl CookieClient {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            page_limit: config.page_limit,
        }
    }

    /// Full request URL for `page`.
    pub fn page_url(&self, page: u32) -> FetchResult<String> {
        let input = BatchInput::for_page(page, self.page_limit).encode()?;
        Ok(format!("{}{}", self.api_url, input))
    }
}

#[async_trait]
impl ProjectSource for CookieClient {
    async fn fetch_page(&self, page: u32) -> FetchResult<ProjectsPage> {
        let url = self.page_url(page)?;
        tracing::info!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "*/*")
            .header("Connection", "keep-alive")
            .header("Accept-Encoding", ACCEPT_ENCODING)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;
        extract_page(&parsed)
    }
}
