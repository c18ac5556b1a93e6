use super::{require_urls, FirecrawlApp, ToolResponse};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Input parameters for starting a batch scrape
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchScrapeInput {
    /// URLs to scrape
    pub urls: Vec<String>,
}

impl BatchScrapeInput {
    pub fn validate(&self) -> Result<()> {
        require_urls(&self.urls)
    }
}

impl FirecrawlApp {
    #[instrument(skip(self, urls), fields(url_count = urls.len()))]
    pub async fn start_batch_scrape(&self, urls: &[String]) -> Result<ToolResponse> {
        info!("Starting batch scrape for {} URLs", urls.len());
        let result = match self.client().await? {
            Ok(client) => client.async_batch_scrape_urls(urls).await,
            Err(e) => Err(e),
        };
        Self::settle(
            result,
            &format!("starting batch scrape for {} URLs", urls.len()),
        )
    }

    #[instrument(skip(self))]
    pub async fn check_batch_scrape_status(&self, job_id: &str) -> Result<ToolResponse> {
        debug!("Checking batch scrape status: {}", job_id);
        let result = match self.client().await? {
            Ok(client) => client.check_batch_scrape_status(job_id).await,
            Err(e) => Err(e),
        };
        Self::settle(
            result,
            &format!("checking batch scrape status for job ID {job_id}"),
        )
    }
}
