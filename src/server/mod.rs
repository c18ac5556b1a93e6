pub mod handler;
pub mod transport;

use crate::tools::FirecrawlApp;
use crate::{Config, Error, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use handler::FirecrawlServerHandler;

pub struct Server {
    config: Arc<Config>,
    app: Arc<FirecrawlApp>,
    cancellation_token: CancellationToken,
}

impl Server {
    pub fn new(config: Config) -> Result<Self> {
        let app = FirecrawlApp::from_config(&config)?;
        Ok(Self::with_app(config, app))
    }

    /// Serve an already constructed adapter
    #[must_use]
    pub fn with_app(config: Config, app: FirecrawlApp) -> Self {
        Self {
            config: Arc::new(config),
            app: Arc::new(app),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting MCP server '{}'", self.config.server.name);

        let handler = FirecrawlServerHandler::new(Arc::clone(&self.app));
        transport::check_stdio_transport();

        let shutdown_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(()) => shutdown_token.cancel(),
                Err(e) => warn!("Failed to install signal handlers: {e}"),
            }
        });

        let server_result = tokio::select! {
            result = Self::run_mcp_server(handler) => result,
            () = self.cancellation_token.cancelled() => {
                info!("Shutdown signal received, stopping MCP server");
                Ok(())
            }
        };

        info!("MCP server shutdown complete");
        server_result
    }

    async fn run_mcp_server(handler: FirecrawlServerHandler) -> Result<()> {
        info!("Connecting MCP server to stdio transport");

        let server = handler
            .serve(stdio())
            .await
            .map_err(|e| Error::Service(format!("Failed to start MCP server: {e}")))?;

        let quit_reason = server
            .waiting()
            .await
            .map_err(|e| Error::Service(format!("MCP server error: {e}")))?;

        info!("MCP server completed with reason: {:?}", quit_reason);
        Ok(())
    }

    pub fn shutdown(&self) {
        warn!("Initiating server shutdown");
        self.cancellation_token.cancel();
    }

    /// Check if the server has been requested to shutdown
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn app(&self) -> &FirecrawlApp {
        &self.app
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
        _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C, initiating graceful shutdown");
    Ok(())
}
