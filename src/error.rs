//! Error types for asc-submit

use serde::Deserialize;
use tracing::{error, warn};

/// Result alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during the submission pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The app has no builds at all in TestFlight
    #[error("no TestFlight builds found for app {0}")]
    BuildNotFound(String),

    /// No build or App Store version matches the requested version label
    #[error("version '{0}' not found")]
    VersionNotFound(String),

    /// The version's lifecycle state is outside the known enumeration
    #[error("version {version} is in state {state} and cannot be submitted")]
    InvalidVersionState {
        /// Version string that was being submitted
        version: String,
        /// The unrecognized appStoreState value
        state: String,
    },

    /// No review submission exists for the app after the create attempt
    #[error("no review submission found for app {0}")]
    ReviewSubmissionNotFound(String),

    /// The App Store Connect API answered with a non-success status
    #[error("App Store Connect request failed with status {status}")]
    ConnectApi {
        /// HTTP status code of the response
        status: u16,
        /// Raw response body, useful for diagnostics and error classification
        body: String,
    },

    /// Transport-level HTTP error (no response available)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Authentication/credential error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error document returned by App Store Connect
#[derive(Debug, Deserialize)]
pub struct ApiErrorDocument {
    /// Individual error details, most specific first
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// A single error entry in an App Store Connect error document
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code
    #[serde(default)]
    pub code: Option<String>,
    /// Short error title
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable detail message
    #[serde(default)]
    pub detail: Option<String>,
}

impl Error {
    /// Parse the structured error document out of a `ConnectApi` body, if any.
    pub fn api_errors(&self) -> Option<ApiErrorDocument> {
        match self {
            Self::ConnectApi { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Log diagnostic detail for an API failure before it is propagated.
///
/// Annotates only; the error is always rethrown unchanged by the caller.
/// For 403 and 409 a hint is added since those are the two statuses users
/// hit most often with misconfigured keys or conflicting version state.
pub fn log_api_failure(err: &Error) {
    let Error::ConnectApi { status, body } = err else {
        return;
    };

    error!(status, "App Store Connect request failed");
    match status {
        403 => warn!(
            "permission denied: the API key may lack access; it needs the \
             'App Manager' role or higher with App Store access"
        ),
        409 => warn!(
            "conflict: the version may already be submitted or in a state \
             that does not allow this operation"
        ),
        _ => {}
    }

    if !body.is_empty() {
        error!(%body, "response body");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_parses_error_document() {
        let err = Error::ConnectApi {
            status: 409,
            body: r#"{"errors":[{"code":"STATE_ERROR","title":"bad state","detail":"nope"}]}"#
                .to_string(),
        };

        let doc = err.api_errors().expect("should parse");
        assert_eq!(doc.errors.len(), 1);
        assert_eq!(doc.errors[0].detail.as_deref(), Some("nope"));
    }

    #[test]
    fn api_errors_none_for_unparseable_body() {
        let err = Error::ConnectApi {
            status: 500,
            body: "<html>gateway timeout</html>".to_string(),
        };
        assert!(err.api_errors().is_none());
    }

    #[test]
    fn api_errors_none_for_other_variants() {
        let err = Error::VersionNotFound("1.2.3".to_string());
        assert!(err.api_errors().is_none());
    }
}
