//! Credential sources and the per-adapter API key cache.

pub mod cache;
pub mod env;

pub use cache::CredentialCache;
pub use env::EnvironmentSource;

use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Field-name variants probed for the API key, in priority order
pub const API_KEY_FIELDS: [&str; 3] = ["api_key", "API_KEY", "apiKey"];

/// Credential material as returned by a source
pub type CredentialMap = HashMap<String, String>;

/// Opaque API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Find the key in a credential mapping, first non-empty variant wins
    #[must_use]
    pub fn from_map(map: &CredentialMap) -> Option<Self> {
        API_KEY_FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find(|value| !value.trim().is_empty())
            .map(|value| Self(value.clone()))
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Remediation guidance returned by an interactive authorization step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorizationGuidance {
    PlainMessage(String),
    RedirectUrl {
        url: String,
    },
    DetailedMessage {
        message: String,
    },
}

impl AuthorizationGuidance {
    /// Text shown to the caller
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainMessage(text) => text,
            Self::RedirectUrl { url } => url,
            Self::DetailedMessage { message } => message,
        }
    }
}

/// Pluggable supplier of API key material
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Name used in remediation messages
    fn name(&self) -> &str;

    /// Fetch the current credential mapping
    async fn get_credentials(&self) -> Result<CredentialMap>;

    /// Optional interactive authorization step. `Ok(None)` means the source
    /// has no such capability.
    async fn authorize(&self) -> Result<Option<AuthorizationGuidance>> {
        Ok(None)
    }
}

/// In-memory source, used for keys supplied through configuration
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    credentials: CredentialMap,
}

impl StaticSource {
    #[must_use]
    pub fn new(name: impl Into<String>, credentials: CredentialMap) -> Self {
        Self {
            name: name.into(),
            credentials,
        }
    }

    #[must_use]
    pub fn with_api_key(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut credentials = CredentialMap::new();
        credentials.insert(API_KEY_FIELDS[0].to_string(), api_key.into());
        Self::new(name, credentials)
    }
}

#[async_trait]
impl CredentialSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_credentials(&self) -> Result<CredentialMap> {
        Ok(self.credentials.clone())
    }
}
