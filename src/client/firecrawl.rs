use super::{ClientError, ClientErrorKind, ClientResult, ExtractRequest, HttpClientConfig, ScrapeClient};
use crate::credentials::ApiKey;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

/// Firecrawl v1 REST client.
///
/// Holds the API key for a single adapter call; a new instance is built per
/// operation by the `ClientFactory`.
pub struct FirecrawlClient {
    http_client: Client,
    base_url: Url,
}

impl std::fmt::Debug for FirecrawlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirecrawlClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FirecrawlClient {
    pub fn new(config: &HttpClientConfig, api_key: &ApiKey) -> Result<Self> {
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
            .map_err(|_| Error::Authorization("API key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| Error::Service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::new(
                    ClientErrorKind::Request,
                    format!("base URL cannot be a base: {}", self.base_url),
                )
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);
        Ok(self.http_client.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> ClientResult<Value> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            warn!("Firecrawl API error ({}): {}", status, message);
            return Err(ClientError::http(
                status.as_u16(),
                format!("{status}: {message}"),
            ));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ScrapeClient for FirecrawlClient {
    async fn scrape_url(&self, url: &str) -> ClientResult<Value> {
        let request = self.request(Method::POST, &["scrape"])?.json(&json!({ "url": url }));
        self.send(request).await
    }

    async fn search(&self, query: &str) -> ClientResult<Value> {
        let request = self
            .request(Method::POST, &["search"])?
            .json(&json!({ "query": query }));
        self.send(request).await
    }

    async fn async_crawl_url(&self, url: &str) -> ClientResult<Value> {
        let request = self.request(Method::POST, &["crawl"])?.json(&json!({ "url": url }));
        self.send(request).await
    }

    async fn check_crawl_status(&self, id: &str) -> ClientResult<Value> {
        let request = self.request(Method::GET, &["crawl", id])?;
        self.send(request).await
    }

    async fn cancel_crawl(&self, id: &str) -> ClientResult<Value> {
        let request = self.request(Method::DELETE, &["crawl", id])?;
        self.send(request).await
    }

    async fn async_batch_scrape_urls(&self, urls: &[String]) -> ClientResult<Value> {
        let request = self
            .request(Method::POST, &["batch", "scrape"])?
            .json(&json!({ "urls": urls }));
        self.send(request).await
    }

    async fn check_batch_scrape_status(&self, id: &str) -> ClientResult<Value> {
        let request = self.request(Method::GET, &["batch", "scrape", id])?;
        self.send(request).await
    }

    async fn async_extract(&self, extract: &ExtractRequest) -> ClientResult<Value> {
        let request = self.request(Method::POST, &["extract"])?.json(extract);
        self.send(request).await
    }

    async fn get_extract_status(&self, job_id: &str) -> ClientResult<Value> {
        let request = self.request(Method::GET, &["extract", job_id])?;
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str) -> FirecrawlClient {
        let config = HttpClientConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            user_agent: "test".to_string(),
        };
        FirecrawlClient::new(&config, &ApiKey::new("fc-test")).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let c = client("https://api.firecrawl.dev");
        assert_eq!(
            c.endpoint(&["batch", "scrape", "job-1"]).unwrap().as_str(),
            "https://api.firecrawl.dev/v1/batch/scrape/job-1"
        );

        let c = client("http://localhost:3002/");
        assert_eq!(
            c.endpoint(&["scrape"]).unwrap().as_str(),
            "http://localhost:3002/v1/scrape"
        );
    }

    #[test]
    fn test_job_ids_are_escaped() {
        let c = client("https://api.firecrawl.dev");
        assert_eq!(
            c.endpoint(&["crawl", "../admin"]).unwrap().as_str(),
            "https://api.firecrawl.dev/v1/crawl/..%2Fadmin"
        );
    }

    #[test]
    fn test_key_with_newline_rejected() {
        let config = HttpClientConfig {
            base_url: Url::parse("https://api.firecrawl.dev").unwrap(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            user_agent: "test".to_string(),
        };
        let result = FirecrawlClient::new(&config, &ApiKey::new("bad\nkey"));
        assert!(matches!(result, Err(Error::Authorization(_))));
    }
}
