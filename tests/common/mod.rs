#![allow(dead_code)]

use async_trait::async_trait;
use firecrawl_mcp::client::ClientResult;
use firecrawl_mcp::{
    ApiKey, AuthorizationGuidance, ClientError, Connector, CredentialMap, CredentialSource, Error,
    ExtractRequest, Result, ScrapeClient,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Credential source with a fixed mapping and optional guidance
pub struct MockSource {
    pub credentials: CredentialMap,
    pub guidance: Option<AuthorizationGuidance>,
    pub fetches: AtomicUsize,
}

impl MockSource {
    pub fn new(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            credentials: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            guidance: None,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn with_guidance(guidance: AuthorizationGuidance) -> Arc<Self> {
        Arc::new(Self {
            credentials: CredentialMap::new(),
            guidance: Some(guidance),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_credentials(&self) -> Result<CredentialMap> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.credentials.clone())
    }

    async fn authorize(&self) -> Result<Option<AuthorizationGuidance>> {
        Ok(self.guidance.clone())
    }
}

/// A recorded client call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub arg: Value,
    pub api_key: String,
}

/// Connector producing clients that answer every call with `reply`
pub struct MockConnector {
    reply: std::result::Result<Value, ClientError>,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub connects: AtomicUsize,
}

impl MockConnector {
    pub fn ok(value: Value) -> Arc<Self> {
        Self::with_reply(Ok(value))
    }

    pub fn failing(error: ClientError) -> Arc<Self> {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: std::result::Result<Value, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            connects: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self, api_key: &ApiKey) -> Result<Box<dyn ScrapeClient>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockClient {
            reply: self.reply.clone(),
            calls: Arc::clone(&self.calls),
            api_key: api_key.expose().to_string(),
        }))
    }
}

/// Connector that fails to build a client with the given error
pub struct BrokenConnector {
    pub error: fn() -> Error,
}

impl Connector for BrokenConnector {
    fn connect(&self, _api_key: &ApiKey) -> Result<Box<dyn ScrapeClient>> {
        Err((self.error)())
    }
}

struct MockClient {
    reply: std::result::Result<Value, ClientError>,
    calls: Arc<Mutex<Vec<Call>>>,
    api_key: String,
}

impl MockClient {
    fn record(&self, method: &'static str, arg: Value) -> ClientResult<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            arg,
            api_key: self.api_key.clone(),
        });
        self.reply.clone()
    }
}

#[async_trait]
impl ScrapeClient for MockClient {
    async fn scrape_url(&self, url: &str) -> ClientResult<Value> {
        self.record("scrape_url", json!(url))
    }

    async fn search(&self, query: &str) -> ClientResult<Value> {
        self.record("search", json!(query))
    }

    async fn async_crawl_url(&self, url: &str) -> ClientResult<Value> {
        self.record("async_crawl_url", json!(url))
    }

    async fn check_crawl_status(&self, id: &str) -> ClientResult<Value> {
        self.record("check_crawl_status", json!(id))
    }

    async fn cancel_crawl(&self, id: &str) -> ClientResult<Value> {
        self.record("cancel_crawl", json!(id))
    }

    async fn async_batch_scrape_urls(&self, urls: &[String]) -> ClientResult<Value> {
        self.record("async_batch_scrape_urls", json!(urls))
    }

    async fn check_batch_scrape_status(&self, id: &str) -> ClientResult<Value> {
        self.record("check_batch_scrape_status", json!(id))
    }

    async fn async_extract(&self, request: &ExtractRequest) -> ClientResult<Value> {
        self.record("async_extract", serde_json::to_value(request).unwrap())
    }

    async fn get_extract_status(&self, job_id: &str) -> ClientResult<Value> {
        self.record("get_extract_status", json!(job_id))
    }
}
