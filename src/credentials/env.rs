use super::{AuthorizationGuidance, CredentialMap, CredentialSource, API_KEY_FIELDS};
use crate::Result;
use async_trait::async_trait;
use tracing::debug;

/// Reads the API key from a single environment variable.
///
/// An unset or blank variable yields an empty mapping; remediation is then
/// offered through [`CredentialSource::authorize`].
#[derive(Debug, Clone)]
pub struct EnvironmentSource {
    var: String,
}

impl EnvironmentSource {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

#[async_trait]
impl CredentialSource for EnvironmentSource {
    fn name(&self) -> &str {
        &self.var
    }

    async fn get_credentials(&self) -> Result<CredentialMap> {
        let mut credentials = CredentialMap::new();
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => {
                credentials.insert(API_KEY_FIELDS[0].to_string(), value);
            }
            _ => debug!("Environment variable {} is not set", self.var),
        }
        Ok(credentials)
    }

    async fn authorize(&self) -> Result<Option<AuthorizationGuidance>> {
        Ok(Some(AuthorizationGuidance::PlainMessage(format!(
            "Set the {} environment variable to your Firecrawl API key (https://www.firecrawl.dev/app/api-keys) and restart the server.",
            self.var
        ))))
    }
}
