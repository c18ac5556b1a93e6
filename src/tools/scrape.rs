use super::{require_non_empty, FirecrawlApp, ToolResponse};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Input parameters for the scrape tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeInput {
    /// URL of the web page to scrape
    pub url: String,
}

impl ScrapeInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("url", &self.url)
    }
}

/// Input parameters for the search tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Search query string
    pub query: String,
}

impl SearchInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("query", &self.query)
    }
}

impl FirecrawlApp {
    /// Scrape a single URL
    #[instrument(skip(self))]
    pub async fn scrape_url(&self, url: &str) -> Result<ToolResponse> {
        info!("Scraping URL: {}", url);
        let result = match self.client().await? {
            Ok(client) => client.scrape_url(url).await,
            Err(e) => Err(e),
        };
        Self::settle(result, &format!("scraping URL {url}"))
    }

    /// Run a web search
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<ToolResponse> {
        info!("Searching: '{}'", query);
        let result = match self.client().await? {
            Ok(client) => client.search(query).await,
            Err(e) => Err(e),
        };
        Self::settle(result, &format!("search for '{query}'"))
    }
}
