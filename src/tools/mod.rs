pub mod batch;
pub mod crawl;
pub mod extract;
pub mod scrape;

pub use batch::BatchScrapeInput;
pub use crawl::{CrawlInput, CrawlJob};
pub use extract::ExtractInput;
pub use scrape::{ScrapeInput, SearchInput};

use crate::client::{
    classify, ClientError, ClientFactory, ClientResult, Classified, Connector, HttpConnector, ScrapeClient,
};
use crate::config::Config;
use crate::credentials::{CredentialCache, CredentialSource, EnvironmentSource, StaticSource};
use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a tool operation that did not hit a hard failure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResponse {
    /// Value returned by the service
    Data(Value),
    /// The service call failed; the message describes the operation and cause
    OperationalError(String),
}

impl ToolResponse {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::OperationalError(_))
    }

    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::OperationalError(_) => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Data(_) => None,
            Self::OperationalError(message) => Some(message),
        }
    }
}

/// Input for tools addressing an existing job
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobInput {
    /// Job identifier returned by the corresponding start tool
    pub job_id: String,
}

impl JobInput {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("job_id", &self.job_id)
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput {
            field: field.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_urls(urls: &[String]) -> Result<()> {
    if urls.is_empty() {
        return Err(Error::InvalidInput {
            field: "urls".to_string(),
            reason: "at least one URL is required".to_string(),
        });
    }
    urls.iter().try_for_each(|url| require_non_empty("urls", url))
}

/// Static description of a tool for discovery and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

impl ToolDescriptor {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "scrape_url",
        description: "Scrape a single URL and return the extracted page content.",
        tags: &["scrape", "important"],
    },
    ToolDescriptor {
        name: "search",
        description: "Perform a web search and return the matching results.",
        tags: &["search", "important"],
    },
    ToolDescriptor {
        name: "start_crawl",
        description: "Start a crawl job for a URL. Returns the job ID immediately.",
        tags: &["crawl", "async_job", "start"],
    },
    ToolDescriptor {
        name: "check_crawl_status",
        description: "Check the status of a previously started crawl job.",
        tags: &["crawl", "async_job", "status"],
    },
    ToolDescriptor {
        name: "cancel_crawl",
        description: "Cancel a running crawl job.",
        tags: &["crawl", "async_job", "management", "cancel"],
    },
    ToolDescriptor {
        name: "start_batch_scrape",
        description: "Start a batch scrape job for multiple URLs.",
        tags: &["scrape", "batch", "async_job", "start"],
    },
    ToolDescriptor {
        name: "check_batch_scrape_status",
        description: "Check the status of a previously started batch scrape job.",
        tags: &["scrape", "batch", "async_job", "status"],
    },
    ToolDescriptor {
        name: "start_extract",
        description: "Start an AI extraction job over one or more URLs, optionally guided by a prompt and JSON schema.",
        tags: &["extract", "ai", "async_job", "start"],
    },
    ToolDescriptor {
        name: "check_extract_status",
        description: "Check the status of a previously started extraction job.",
        tags: &["extract", "ai", "async_job", "status"],
    },
];

/// Firecrawl adapter exposing the nine tool operations
pub struct FirecrawlApp {
    name: String,
    factory: ClientFactory,
}

impl std::fmt::Debug for FirecrawlApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirecrawlApp")
            .field("name", &self.name)
            .field("factory", &self.factory)
            .finish()
    }
}

impl FirecrawlApp {
    /// Create an adapter over explicit parts.
    ///
    /// Either part may be absent; operations then fail with
    /// [`Error::FatalConfiguration`] on first use.
    #[must_use]
    pub fn new(
        integration: Option<Arc<dyn CredentialSource>>,
        connector: Option<Arc<dyn Connector>>,
    ) -> Self {
        Self {
            name: "firecrawl".to_string(),
            factory: ClientFactory::new(connector, CredentialCache::new(integration)),
        }
    }

    /// Create an adapter talking HTTP to the configured Firecrawl API
    pub fn from_config(config: &Config) -> Result<Self> {
        let integration: Arc<dyn CredentialSource> = match config.credentials.api_key {
            Some(ref key) => Arc::new(StaticSource::with_api_key("configuration", key.clone())),
            None => Arc::new(EnvironmentSource::new(config.credentials.env_var.clone())),
        };
        let connector = HttpConnector::from_config(&config.firecrawl)?;

        info!(
            "Initialized Firecrawl adapter for {} (credentials from {})",
            config.firecrawl.api_url,
            integration.name()
        );

        Ok(Self {
            name: config.server.name.clone(),
            factory: ClientFactory::new(
                Some(Arc::new(connector)),
                CredentialCache::new(Some(integration)),
            ),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tools(&self) -> &'static [ToolDescriptor] {
        TOOLS
    }

    #[must_use]
    pub fn tools_with_tag(&self, tag: &str) -> Vec<&'static ToolDescriptor> {
        TOOLS.iter().filter(|tool| tool.has_tag(tag)).collect()
    }

    /// Whether the API key has already been resolved
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.factory.credentials().is_resolved()
    }

    /// Build a client for one call.
    ///
    /// Hard failures are raised; any other build failure is handed back as a
    /// [`ClientError`] so it is classified like a failed service call.
    async fn client(&self) -> Result<ClientResult<Box<dyn ScrapeClient>>> {
        match self.factory.build().await {
            Ok(client) => Ok(Ok(client)),
            Err(e) if e.is_hard_failure() => Err(e),
            Err(e) => {
                warn!("Failed to build Firecrawl client: {}", e);
                Ok(Err(ClientError::from(e)))
            }
        }
    }

    /// Apply the propagation policy to a finished client call
    fn settle(result: ClientResult<Value>, operation: &str) -> Result<ToolResponse> {
        match result {
            Ok(value) => Ok(ToolResponse::Data(value)),
            Err(err) => match classify(&err, operation) {
                Classified::Raise(e) => {
                    warn!("Authorization rejected during {}: {}", operation, err);
                    Err(e)
                }
                Classified::Report(message) => Ok(ToolResponse::OperationalError(message)),
            },
        }
    }
}
