use super::{require_non_empty, FirecrawlApp, ToolResponse};
use crate::client::{ClientError, ClientErrorKind, ClientResult};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Input parameters for starting a crawl
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrawlInput {
    /// Starting URL for the crawl
    pub url: String,
}

impl CrawlInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("url", &self.url)
    }
}

/// Crawl-start response narrowed to the fields callers need.
///
/// Absent fields stay in the output as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlJob {
    pub success: Option<bool>,
    pub id: Option<String>,
    pub url: Option<String>,
}

impl CrawlJob {
    pub fn from_response(response: Value) -> ClientResult<Self> {
        serde_json::from_value(response).map_err(|e| {
            ClientError::new(
                ClientErrorKind::Decode,
                format!("unexpected crawl response: {e}"),
            )
        })
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::json!({
            "success": self.success,
            "id": self.id,
            "url": self.url,
        })
    }
}

impl FirecrawlApp {
    /// Start a crawl job; returns `{success, id, url}` without waiting
    #[instrument(skip(self))]
    pub async fn start_crawl(&self, url: &str) -> Result<ToolResponse> {
        info!("Starting crawl for URL: {}", url);
        let result = match self.client().await? {
            Ok(client) => client.async_crawl_url(url).await,
            Err(e) => Err(e),
        };
        let result = result
            .and_then(CrawlJob::from_response)
            .map(CrawlJob::into_value);
        Self::settle(result, &format!("starting crawl for URL {url}"))
    }

    #[instrument(skip(self))]
    pub async fn check_crawl_status(&self, job_id: &str) -> Result<ToolResponse> {
        debug!("Checking crawl status: {}", job_id);
        let result = match self.client().await? {
            Ok(client) => client.check_crawl_status(job_id).await,
            Err(e) => Err(e),
        };
        Self::settle(
            result,
            &format!("checking crawl status for job ID {job_id}"),
        )
    }

    #[instrument(skip(self))]
    pub async fn cancel_crawl(&self, job_id: &str) -> Result<ToolResponse> {
        info!("Cancelling crawl job: {}", job_id);
        let result = match self.client().await? {
            Ok(client) => client.cancel_crawl(job_id).await,
            Err(e) => Err(e),
        };
        Self::settle(result, &format!("cancelling crawl job ID {job_id}"))
    }
}
