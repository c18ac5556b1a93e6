use anyhow::Context;
use clap::Parser;
use firecrawl_mcp::{Config, ConfigOverrides, FirecrawlApp, Server};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// MCP server exposing the Firecrawl scraping API as tools
#[derive(Debug, Parser)]
#[command(name = "firecrawl-mcp", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "FIRECRAWL_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Firecrawl API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Environment variable holding the API key
    #[arg(long)]
    env_var: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print the available tools and exit
    #[arg(long)]
    list_tools: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            env_var: self.env_var.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // stdout carries the MCP transport, so logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(&cli.overrides());
    config.validate().context("invalid configuration")?;

    if cli.list_tools {
        let app = FirecrawlApp::from_config(&config)?;
        for tool in app.tools() {
            println!("{:<28} [{}] {}", tool.name, tool.tags.join(", "), tool.description);
        }
        return Ok(());
    }

    init_tracing(&config);
    info!("Starting firecrawl-mcp v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new(config)?;
    server.run().await?;
    Ok(())
}
