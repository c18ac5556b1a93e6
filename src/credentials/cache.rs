use super::{ApiKey, CredentialSource};
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// Holds at most one resolved API key per adapter instance.
///
/// Resolution happens on first use and is never repeated once it succeeds.
/// Failed attempts leave the cache empty so the next call fetches again.
pub struct CredentialCache {
    source: Option<Arc<dyn CredentialSource>>,
    key: OnceCell<ApiKey>,
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .field("resolved", &self.key.initialized())
            .finish()
    }
}

impl CredentialCache {
    #[must_use]
    pub fn new(source: Option<Arc<dyn CredentialSource>>) -> Self {
        Self {
            source,
            key: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.key.initialized()
    }

    /// Return the cached key, fetching it from the source on first use
    pub async fn get(&self) -> Result<ApiKey> {
        self.key.get_or_try_init(|| self.resolve()).await.cloned()
    }

    #[instrument(skip(self))]
    async fn resolve(&self) -> Result<ApiKey> {
        let source = self.source.as_ref().ok_or_else(|| {
            Error::FatalConfiguration(
                "integration not configured: no credential source was provided".to_string(),
            )
        })?;

        debug!("Fetching credentials from {}", source.name());
        let credentials = source.get_credentials().await.map_err(|e| {
            if e.is_hard_failure() {
                e
            } else {
                Error::Authorization(e.to_string())
            }
        })?;

        if let Some(key) = ApiKey::from_map(&credentials) {
            info!("Resolved API key from {}", source.name());
            return Ok(key);
        }

        let mut message = format!(
            "API key for {} not found. Please configure a Firecrawl API key.",
            source.name()
        );
        match source.authorize().await {
            Ok(Some(guidance)) => message = guidance.text().to_string(),
            Ok(None) => {}
            Err(e) => debug!("Authorization guidance unavailable: {e}"),
        }

        warn!("No API key available from {}", source.name());
        Err(Error::Authorization(message))
    }
}
