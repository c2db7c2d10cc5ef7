use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{Credentials, NewsConfig};

/// One raw item of the news-search response, before sanitization.
/// Other item fields (`originallink`, `link`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<NewsItem>,
}

pub trait NewsCollector {
    /// Fetches up to `display` items for `query`, newest first.
    /// A non-success status is not an error: it is logged and yields no items.
    fn collect_news(&self, query: &str, display: u32) -> Result<Vec<NewsItem>>;
}

pub struct NaverNewsCollector {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl NaverNewsCollector {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials: config.credentials.clone(),
        })
    }
}

impl NewsCollector for NaverNewsCollector {
    fn collect_news(&self, query: &str, display: u32) -> Result<Vec<NewsItem>> {
        let display = display.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("display", display.as_str()), ("sort", "date")])
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .send()
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "news search returned an error status");
            return Ok(vec![]);
        }

        let text = resp.text().context("Failed to read news search response")?;
        let parsed: SearchResponse =
            serde_json::from_str(&text).context("Failed to parse news search JSON")?;
        debug!(count = parsed.items.len(), "news search returned items");
        Ok(parsed.items)
    }
}
