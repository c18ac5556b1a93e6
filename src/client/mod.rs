pub mod classify;
pub mod firecrawl;

pub use classify::{classify, Classified};
pub use firecrawl::FirecrawlClient;

use crate::config::FirecrawlConfig;
use crate::credentials::{ApiKey, CredentialCache};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration for the Firecrawl API
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the Firecrawl API
    pub base_url: url::Url,
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn from_config(config: &FirecrawlConfig) -> Result<Self> {
        let base_url = url::Url::parse(&config.api_url).map_err(|e| Error::InvalidInput {
            field: "firecrawl.api_url".to_string(),
            reason: format!("not a valid URL: {e}"),
        })?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(10),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Broad class of a client-side failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    Timeout,
    Connection,
    /// Non-success HTTP status
    Http,
    /// Response body could not be decoded
    Decode,
    Request,
}

impl ClientErrorKind {
    /// Type name reported in operational error messages
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Timeout => "TimeoutError",
            Self::Connection => "ConnectionError",
            Self::Http => "HttpError",
            Self::Decode => "DecodeError",
            Self::Request => "RequestError",
        }
    }
}

/// Normalized description of a failed client call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl ClientError {
    #[must_use]
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    #[must_use]
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ClientErrorKind::Http,
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ClientErrorKind::Timeout
        } else if err.is_connect() {
            ClientErrorKind::Connection
        } else if err.is_decode() {
            ClientErrorKind::Decode
        } else if err.is_status() {
            ClientErrorKind::Http
        } else {
            ClientErrorKind::Request
        };

        Self {
            kind,
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()),
        }
    }
}

/// Adapter errors met while preparing a call, such as a client that cannot be built
impl From<Error> for ClientError {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) => e.into(),
            other => Self::new(ClientErrorKind::Request, other.to_string()),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Parameters of an extraction job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub allow_external_links: bool,
}

/// Method surface of the remote scraping service
#[async_trait]
pub trait ScrapeClient: Send + Sync {
    async fn scrape_url(&self, url: &str) -> ClientResult<Value>;

    async fn search(&self, query: &str) -> ClientResult<Value>;

    /// Start a crawl without waiting for it to finish
    async fn async_crawl_url(&self, url: &str) -> ClientResult<Value>;

    async fn check_crawl_status(&self, id: &str) -> ClientResult<Value>;

    async fn cancel_crawl(&self, id: &str) -> ClientResult<Value>;

    async fn async_batch_scrape_urls(&self, urls: &[String]) -> ClientResult<Value>;

    async fn check_batch_scrape_status(&self, id: &str) -> ClientResult<Value>;

    async fn async_extract(&self, request: &ExtractRequest) -> ClientResult<Value>;

    async fn get_extract_status(&self, job_id: &str) -> ClientResult<Value>;
}

/// Binding that turns an API key into a client
pub trait Connector: Send + Sync {
    fn connect(&self, api_key: &ApiKey) -> Result<Box<dyn ScrapeClient>>;
}

/// Builds [`FirecrawlClient`]s over HTTP
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: HttpClientConfig,
}

impl HttpConnector {
    #[must_use]
    pub const fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &FirecrawlConfig) -> Result<Self> {
        Ok(Self::new(HttpClientConfig::from_config(config)?))
    }
}

impl Connector for HttpConnector {
    fn connect(&self, api_key: &ApiKey) -> Result<Box<dyn ScrapeClient>> {
        Ok(Box::new(FirecrawlClient::new(&self.config, api_key)?))
    }
}

/// Creates a fresh authenticated client for every operation
pub struct ClientFactory {
    connector: Option<Arc<dyn Connector>>,
    credentials: CredentialCache,
}

impl std::fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFactory")
            .field("connector", &self.connector.is_some())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ClientFactory {
    #[must_use]
    pub fn new(connector: Option<Arc<dyn Connector>>, credentials: CredentialCache) -> Self {
        Self {
            connector,
            credentials,
        }
    }

    #[must_use]
    pub const fn credentials(&self) -> &CredentialCache {
        &self.credentials
    }

    pub async fn build(&self) -> Result<Box<dyn ScrapeClient>> {
        // Checked before credentials: without a binding the key is irrelevant
        let connector = self.connector.as_ref().ok_or_else(|| {
            Error::FatalConfiguration(
                "Firecrawl client library not installed: no client connector configured"
                    .to_string(),
            )
        })?;

        let api_key = self.credentials.get().await?;
        debug!("Building Firecrawl client");
        connector.connect(&api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialSource, StaticSource};

    #[test]
    fn test_extract_request_serialization() {
        let request = ExtractRequest {
            urls: vec!["https://example.com".to_string()],
            prompt: Some("List the products".to_string()),
            schema: None,
            system_prompt: None,
            allow_external_links: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "urls": ["https://example.com"],
                "prompt": "List the products",
                "allowExternalLinks": false
            })
        );
    }

    #[test]
    fn test_http_client_config_rejects_bad_url() {
        let config = FirecrawlConfig {
            api_url: "::nope".to_string(),
            ..FirecrawlConfig::default()
        };
        assert!(HttpClientConfig::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_missing_connector_checked_before_credentials() {
        let factory = ClientFactory::new(None, CredentialCache::new(None));
        match factory.build().await {
            Err(Error::FatalConfiguration(msg)) => assert!(msg.contains("not installed")),
            other => panic!("expected fatal configuration, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_build_resolves_credentials() {
        let source: Arc<dyn CredentialSource> = Arc::new(StaticSource::with_api_key("test", "k"));
        let connector = HttpConnector::from_config(&FirecrawlConfig::default()).unwrap();
        let factory = ClientFactory::new(Some(Arc::new(connector)), CredentialCache::new(Some(source)));

        assert!(factory.build().await.is_ok());
        assert!(factory.credentials().is_resolved());
    }
}
