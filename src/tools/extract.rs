use super::{require_urls, FirecrawlApp, ToolResponse};
use crate::client::ExtractRequest;
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Input parameters for starting an extraction job
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractInput {
    /// URLs to extract data from
    pub urls: Vec<String>,
    /// Natural-language description of the data to extract
    #[serde(default)]
    pub prompt: Option<String>,
    /// JSON schema the extracted data should follow
    #[serde(default)]
    pub schema: Option<Value>,
    /// System prompt for the extraction model
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Follow links leading outside the given URLs (default: false)
    #[serde(default)]
    pub allow_external_links: bool,
}

impl ExtractInput {
    pub fn validate(&self) -> Result<()> {
        require_urls(&self.urls)
    }
}

impl From<ExtractInput> for ExtractRequest {
    fn from(input: ExtractInput) -> Self {
        Self {
            urls: input.urls,
            prompt: input.prompt,
            schema: input.schema,
            system_prompt: input.system_prompt,
            allow_external_links: input.allow_external_links,
        }
    }
}

impl FirecrawlApp {
    /// Start an extraction job; returns the full job response
    #[instrument(skip(self, request), fields(url_count = request.urls.len()))]
    pub async fn start_extract(&self, request: &ExtractRequest) -> Result<ToolResponse> {
        info!("Starting extraction for {} URLs", request.urls.len());
        let result = match self.client().await? {
            Ok(client) => client.async_extract(request).await,
            Err(e) => Err(e),
        };
        let response = Self::settle(
            result,
            &format!("starting extraction for {} URLs", request.urls.len()),
        )?;

        if let ToolResponse::OperationalError(ref message) = response {
            error!("{}", message);
        }
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn check_extract_status(&self, job_id: &str) -> Result<ToolResponse> {
        debug!("Checking extraction status: {}", job_id);
        let result = match self.client().await? {
            Ok(client) => client.get_extract_status(job_id).await,
            Err(e) => Err(e),
        };
        Self::settle(
            result,
            &format!("checking extraction status for job ID {job_id}"),
        )
    }
}
