use firecrawl_mcp::config::FirecrawlConfig;
use firecrawl_mcp::{
    ApiKey, ClientErrorKind, Connector, CredentialSource, Error, ExtractRequest, FirecrawlApp,
    HttpConnector, ScrapeClient, StaticSource, ToolResponse,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> HttpConnector {
    let config = FirecrawlConfig {
        api_url: server.uri(),
        timeout_secs: 5,
        ..FirecrawlConfig::default()
    };
    HttpConnector::from_config(&config).unwrap()
}

fn app(server: &MockServer) -> FirecrawlApp {
    let source: Arc<dyn CredentialSource> = Arc::new(StaticSource::with_api_key("test", "fc-test"));
    let connector: Arc<dyn Connector> = Arc::new(connector(server));
    FirecrawlApp::new(Some(source), Some(connector))
}

#[tokio::test]
async fn test_scrape_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", "Bearer fc-test"))
        .and(body_json(json!({"url": "https://example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"markdown": "# Example Domain"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server).scrape_url("https://example.com").await.unwrap();
    assert_eq!(response.data().unwrap()["data"]["markdown"], "# Example Domain");
}

#[tokio::test]
async fn test_start_crawl_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/crawl"))
        .and(body_json(json!({"url": "http://a"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "id": "job1",
            "url": "http://a",
            "extra": "dropped"
        })))
        .mount(&server)
        .await;

    let response = app(&server).start_crawl("http://a").await.unwrap();
    assert_eq!(
        response,
        ToolResponse::Data(json!({"success": true, "id": "job1", "url": "http://a"}))
    );
}

#[tokio::test]
async fn test_job_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/crawl/job1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "cancelled"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/scrape"))
        .and(body_json(json!({"urls": ["https://a", "https://b"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": "b1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/batch/scrape/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "scraping"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/extract/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&server)
        .await;

    let app = app(&server);
    let status = |r: ToolResponse| r.data().unwrap()["status"].clone();

    assert_eq!(status(app.check_crawl_status("job1").await.unwrap()), "completed");
    assert_eq!(status(app.cancel_crawl("job1").await.unwrap()), "cancelled");

    let urls = vec!["https://a".to_string(), "https://b".to_string()];
    let batch = app.start_batch_scrape(&urls).await.unwrap();
    assert_eq!(batch.data().unwrap()["id"], "b1");
    assert_eq!(status(app.check_batch_scrape_status("b1").await.unwrap()), "scraping");
    assert_eq!(status(app.check_extract_status("e1").await.unwrap()), "processing");
}

#[tokio::test]
async fn test_extract_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/extract"))
        .and(body_json(json!({
            "urls": ["https://shop.example"],
            "prompt": "List products",
            "systemPrompt": "Be terse",
            "allowExternalLinks": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": "e1"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = ExtractRequest {
        urls: vec!["https://shop.example".to_string()],
        prompt: Some("List products".to_string()),
        schema: None,
        system_prompt: Some("Be terse".to_string()),
        allow_external_links: false,
    };
    let response = app(&server).start_extract(&request).await.unwrap();
    assert_eq!(response.data().unwrap()["id"], "e1");
}

#[tokio::test]
async fn test_401_response_raises_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid token"
        })))
        .mount(&server)
        .await;

    let err = app(&server).search("rust").await.unwrap_err();
    assert!(matches!(err, Error::Authorization(ref m) if m.contains("Invalid token")));
}

#[tokio::test]
async fn test_server_error_reported_in_band() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/crawl/job9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Job not found"
        })))
        .mount(&server)
        .await;

    let response = app(&server).check_crawl_status("job9").await.unwrap();
    let message = response.error_message().unwrap();
    assert!(message.starts_with("Error during checking crawl status for job ID job9: HttpError - "));
    assert!(message.contains("Job not found"));
}

#[tokio::test]
async fn test_client_error_normalization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = connector(&server).connect(&ApiKey::new("fc-test")).unwrap();

    let err = client.scrape_url("https://a").await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Http);
    assert_eq!(err.status_code, Some(502));
    assert!(err.message.contains("bad gateway"));

    let err = client.search("q").await.unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Decode);
    assert_eq!(err.status_code, None);
}
