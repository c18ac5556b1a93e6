use crate::tools::{
    BatchScrapeInput, CrawlInput, ExtractInput, FirecrawlApp, JobInput, ScrapeInput, SearchInput,
    ToolDescriptor, ToolResponse,
};
use crate::{Error, Result};
use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData, ServerHandler,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{future::Future, sync::Arc};
use tracing::{debug, info, instrument, warn};

/// JSON-RPC error code reported when the API key is missing or rejected
pub const AUTHORIZATION_REQUIRED: ErrorCode = ErrorCode(-32001);

/// MCP server handler dispatching tool calls to the Firecrawl adapter
#[derive(Debug, Clone)]
pub struct FirecrawlServerHandler {
    app: Arc<FirecrawlApp>,
}

impl FirecrawlServerHandler {
    #[must_use]
    pub fn new(app: Arc<FirecrawlApp>) -> Self {
        info!("Initializing Firecrawl MCP server handler");
        Self { app }
    }

    #[must_use]
    pub fn app(&self) -> &FirecrawlApp {
        &self.app
    }

    /// Health check for the server
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<()> {
        debug!("Ping received - server is healthy");
        Ok(())
    }

    /// Tool definitions advertised through `tools/list`
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<Tool> {
        self.app.tools().iter().map(tool_definition).collect()
    }

    /// Run one tool by name with raw JSON arguments
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> std::result::Result<ToolResponse, ErrorData> {
        let app = &self.app;
        let outcome = match name {
            "scrape_url" => {
                let input: ScrapeInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.scrape_url(&input.url).await
            }
            "search" => {
                let input: SearchInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.search(&input.query).await
            }
            "start_crawl" => {
                let input: CrawlInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.start_crawl(&input.url).await
            }
            "check_crawl_status" => {
                let input: JobInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.check_crawl_status(&input.job_id).await
            }
            "cancel_crawl" => {
                let input: JobInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.cancel_crawl(&input.job_id).await
            }
            "start_batch_scrape" => {
                let input: BatchScrapeInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.start_batch_scrape(&input.urls).await
            }
            "check_batch_scrape_status" => {
                let input: JobInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.check_batch_scrape_status(&input.job_id).await
            }
            "start_extract" => {
                let input: ExtractInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.start_extract(&input.into()).await
            }
            "check_extract_status" => {
                let input: JobInput = parse_input(name, arguments)?;
                input.validate().map_err(invalid_params)?;
                app.check_extract_status(&input.job_id).await
            }
            _ => {
                return Err(ErrorData::invalid_request(
                    format!("Unknown tool: {name}"),
                    None,
                ))
            }
        };

        outcome.map_err(into_error_data)
    }
}

fn tool_definition(descriptor: &ToolDescriptor) -> Tool {
    let schema = match descriptor.name {
        "scrape_url" => input_schema::<ScrapeInput>(),
        "search" => input_schema::<SearchInput>(),
        "start_crawl" => input_schema::<CrawlInput>(),
        "start_batch_scrape" => input_schema::<BatchScrapeInput>(),
        "start_extract" => input_schema::<ExtractInput>(),
        _ => input_schema::<JobInput>(),
    };

    Tool::new(
        descriptor.name,
        format!(
            "{} [tags: {}]",
            descriptor.description,
            descriptor.tags.join(", ")
        ),
        schema,
    )
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn parse_input<T: DeserializeOwned>(
    tool: &str,
    arguments: JsonObject,
) -> std::result::Result<T, ErrorData> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ErrorData::invalid_params(format!("Invalid input for {tool}: {e}"), None))
}

fn invalid_params(err: Error) -> ErrorData {
    ErrorData::invalid_params(err.to_string(), None)
}

/// Hard failures travel on the protocol error channel, never as tool output
fn into_error_data(err: Error) -> ErrorData {
    match err {
        Error::Authorization(message) => ErrorData::new(
            AUTHORIZATION_REQUIRED,
            format!("Authorization failed: {message}"),
            Some(json!({ "kind": "authorization" })),
        ),
        Error::FatalConfiguration(message) => ErrorData::internal_error(
            format!("Fatal configuration error: {message}"),
            Some(json!({ "kind": "fatal_configuration" })),
        ),
        err @ Error::Config(_) => ErrorData::internal_error(
            err.to_string(),
            Some(json!({ "kind": "fatal_configuration" })),
        ),
        other => ErrorData::internal_error(other.to_string(), None),
    }
}

fn into_call_result(response: ToolResponse) -> std::result::Result<CallToolResult, ErrorData> {
    match response {
        ToolResponse::Data(value) => {
            let text = serde_json::to_string_pretty(&value).map_err(|e| {
                ErrorData::internal_error(format!("Serialization failed: {e}"), None)
            })?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        ToolResponse::OperationalError(message) => {
            Ok(CallToolResult::error(vec![Content::text(message)]))
        }
    }
}

impl ServerHandler for FirecrawlServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("MCP server for the Firecrawl web-scraping service. Provides tools to scrape pages, search the web, and manage crawl, batch scrape, and extraction jobs. Start tools return a job ID; poll the matching status tool to follow progress.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        info!("Listing available tools");
        let tools = self.tool_definitions();
        async move { Ok(ListToolsResult::with_all_items(tools)) }
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        info!("Tool called: {}", request.name);

        async move {
            let arguments = request.arguments.unwrap_or_default();
            match self.dispatch(&request.name, arguments).await {
                Ok(response) => {
                    if let Some(message) = response.error_message() {
                        warn!("Tool {} reported an error: {}", request.name, message);
                    }
                    into_call_result(response)
                }
                Err(e) => Err(e),
            }
        }
    }
}
