//! Maps a failed client call onto the adapter's propagation policy.

use super::ClientError;
use crate::Error;

const AUTH_MARKERS: &[&str] = &["unauthorized", "api key", "authentication"];

/// Outcome of classifying a client failure
#[derive(Debug)]
pub enum Classified {
    /// Must be raised to the caller
    Raise(Error),
    /// Reported in-band as a descriptive message
    Report(String),
}

/// Whether a failure means the credential was missing or rejected
#[must_use]
pub fn is_authorization_failure(error: &ClientError) -> bool {
    let message = error.message.to_lowercase();
    AUTH_MARKERS.iter().any(|marker| message.contains(marker)) || error.status_code == Some(401)
}

/// Classify `error` raised while performing `operation`.
///
/// `operation` is a short human-readable description such as
/// `"starting crawl for URL https://example.com"`.
#[must_use]
pub fn classify(error: &ClientError, operation: &str) -> Classified {
    if is_authorization_failure(error) {
        return Classified::Raise(Error::Authorization(error.message.clone()));
    }

    Classified::Report(format!(
        "Error during {operation}: {} - {}",
        error.type_name(),
        error.message
    ))
}
