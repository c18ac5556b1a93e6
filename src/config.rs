//! # Configuration
//!
//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `FIRECRAWL_MCP__SECTION__KEY` environment variables, then CLI
//! overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "FIRECRAWL_MCP";

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: &[&str] = &["pretty", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub firecrawl: FirecrawlConfig,
    pub credentials: CredentialsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name advertised to MCP clients
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "firecrawl".to_string(),
        }
    }
}

/// Settings for the Firecrawl HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirecrawlConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.firecrawl.dev".to_string(),
            timeout_secs: 60,
            user_agent: format!("firecrawl-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Environment variable holding the API key
    pub env_var: String,
    /// Static key; takes precedence over the environment when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: "FIRECRAWL_API_KEY".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Command-line overrides applied after file and environment layers
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub env_var: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl Config {
    /// Default config file location, `<config_dir>/firecrawl-mcp/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("firecrawl-mcp").join("config.toml"))
    }

    /// Load configuration, reading `path` if given or the default location
    /// if it exists.
    ///
    /// The result is not validated; apply overrides first, then call
    /// [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(file) = file {
            debug!("Reading configuration file: {}", file.display());
            // An explicitly requested file must exist
            builder = builder.add_source(::config::File::from(file).required(path.is_some()));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from an explicit file only, without the environment layer
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?)
            .add_source(::config::File::from(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(ref url) = overrides.api_url {
            self.firecrawl.api_url.clone_from(url);
        }
        if let Some(ref var) = overrides.env_var {
            self.credentials.env_var.clone_from(var);
        }
        if let Some(ref level) = overrides.log_level {
            self.logging.level.clone_from(level);
        }
        if let Some(ref format) = overrides.log_format {
            self.logging.format.clone_from(format);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.firecrawl.api_url).map_err(|e| Error::InvalidInput {
            field: "firecrawl.api_url".to_string(),
            reason: format!("not a valid URL: {e}"),
        })?;

        if self.firecrawl.timeout_secs == 0 {
            return Err(Error::InvalidInput {
                field: "firecrawl.timeout_secs".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.credentials.env_var.trim().is_empty() {
            return Err(Error::InvalidInput {
                field: "credentials.env_var".to_string(),
                reason: "environment variable name cannot be empty".to_string(),
            });
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::InvalidInput {
                field: "logging.level".to_string(),
                reason: format!("expected one of {VALID_LOG_LEVELS:?}"),
            });
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(Error::InvalidInput {
                field: "logging.format".to_string(),
                reason: format!("expected one of {VALID_LOG_FORMATS:?}"),
            });
        }

        Ok(())
    }
}
