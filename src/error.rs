//! Error definitions for the routing core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving, matching, or forwarding a request.
#[derive(Debug, Error)]
pub enum RouterError {
    /// All resolution variations were exhausted for the URL.
    ///
    /// Expected control flow: callers map this to their 404 policy rather
    /// than treating it as a failure.
    #[error("page not found: {0}")]
    PageNotFound(String),

    /// Passthru destination used a scheme other than http/https.
    #[error("unsupported passthru protocol: {0}")]
    UnsupportedProtocol(String),

    /// Network failure or timeout during a passthru request.
    #[error("passthru request failed: {0}")]
    ForwardTransport(#[source] reqwest::Error),

    /// A matched redirect rule carried an unrecognized HTTP code.
    #[error("invalid redirect HTTP code: {0}")]
    InvalidRedirectCode(String),

    /// A REGEX/REGEXICASE rule pattern failed to compile.
    #[error("invalid redirect pattern {pattern:?}: {source}")]
    InvalidRedirectPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Passthru destination was not a parseable absolute URL.
    #[error("invalid passthru destination {url:?}: {source}")]
    InvalidDestination {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The redirect listing file did not contain a valid rule array.
    #[error("invalid redirect listing {path:?}: {source}")]
    RedirectListing {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error other than not-found (e.g. permissions).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RouterError {
    /// True for the not-found outcome of path resolution.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::PageNotFound(_))
    }
}

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = RouterError::PageNotFound("/missing".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "page not found: /missing");

        let err = RouterError::InvalidRedirectCode("303".to_string());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("303"));
    }
}
