//! Firecrawl search/scrape client
//!
//! The research pipeline consumes this collaborator through the
//! [`SearchProvider`] trait so tests can stand in a scripted double.
//! [`FirecrawlClient`] talks to the Firecrawl v2 REST API with bearer auth
//! and markdown-format requests.
//!
//! Callers in the pipeline catch any [`SearchError`], log it, and continue
//! with empty results; the pipeline never aborts on a degraded search.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://api.firecrawl.dev";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the search/scrape collaborator
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport-level failure
    #[error("Firecrawl request failed: {0}")]
    Http(String),

    /// The API answered with a non-success status or success=false
    #[error("Firecrawl API error: {0}")]
    Api(String),
}

/// A single search result
#[derive(Debug, Clone, Default)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    /// Scraped markdown for the hit, when the search requested content
    pub markdown: String,
}

/// Web search and page scraping, the pipeline's view of Firecrawl
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Searches the web, returning up to `limit` hits with scraped markdown
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, SearchError>;

    /// Scrapes a single page, returning its markdown content
    async fn scrape(&self, url: &str) -> Result<String, SearchError>;
}

/// Firecrawl v2 REST client
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl FirecrawlClient {
    /// Creates a client with the given API key
    ///
    /// The endpoint can be overridden via `TOOLSCOUT_FIRECRAWL_ENDPOINT`
    /// for tests and enterprise proxies.
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout
    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let endpoint = std::env::var("TOOLSCOUT_FIRECRAWL_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            endpoint,
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, SearchError> {
        let resp = self
            .client
            .post(format!("{}{}", self.endpoint, path))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Api(format!("{} returned HTTP {}", path, status)));
        }

        Ok(resp)
    }
}

#[async_trait]
impl SearchProvider for FirecrawlClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, SearchError> {
        // The pipeline researches companies, so bias results the way the
        // hosted tool does.
        let body = serde_json::json!({
            "query": format!("{query} company pricing"),
            "limit": limit,
            "scrapeOptions": { "formats": ["markdown"] }
        });

        let resp = self.post_json("/v2/search", &body).await?;
        let parsed: FirecrawlSearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Api(e.to_string()))?;

        if !parsed.success {
            return Err(SearchError::Api(
                "search returned success=false".to_string(),
            ));
        }

        let hits: Vec<SearchHit> = parsed
            .data
            .map(|d| d.web)
            .unwrap_or_default()
            .into_iter()
            .map(|h| SearchHit {
                url: h.url.unwrap_or_default(),
                title: h.title.unwrap_or_default(),
                markdown: h.markdown.unwrap_or_default(),
            })
            .collect();

        debug!("Firecrawl search '{}' returned {} hits", query, hits.len());
        Ok(hits)
    }

    async fn scrape(&self, url: &str) -> Result<String, SearchError> {
        let body = serde_json::json!({
            "url": url,
            "formats": ["markdown"],
            "onlyMainContent": true
        });

        let resp = self.post_json("/v2/scrape", &body).await?;
        let parsed: FirecrawlScrapeResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Api(e.to_string()))?;

        if !parsed.success {
            return Err(SearchError::Api(
                "scrape returned success=false".to_string(),
            ));
        }

        Ok(parsed
            .data
            .and_then(|d| d.markdown)
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct FirecrawlSearchResponse {
    success: bool,
    data: Option<FirecrawlSearchData>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlSearchData {
    #[serde(default)]
    web: Vec<FirecrawlWebHit>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlWebHit {
    url: Option<String>,
    title: Option<String>,
    markdown: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlScrapeResponse {
    success: bool,
    data: Option<FirecrawlScrapeData>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlScrapeData {
    markdown: Option<String>,
}
