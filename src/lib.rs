pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod server;
pub mod tools;

pub use client::{ClientError, ClientErrorKind, ClientFactory, Connector, ExtractRequest, HttpConnector, ScrapeClient};
pub use config::{Config, ConfigOverrides};
pub use credentials::{
    ApiKey, AuthorizationGuidance, CredentialCache, CredentialMap, CredentialSource,
    EnvironmentSource, StaticSource,
};
pub use error::{Error, ErrorCategory, Result};
pub use server::{FirecrawlServerHandler, Server};
pub use tools::{CrawlJob, FirecrawlApp, ToolDescriptor, ToolResponse};
