//! Error types for batch preparation and generation.

use std::time::Duration;

use fanout_shorthand::ShorthandError;
use thiserror::Error;

/// Batch-level configuration errors.
///
/// These abort the whole batch before any generator call is made and surface
/// as the `Err` of `prepare`/`dispatch`; they are never folded into a
/// per-item result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An extraction path is meaningless without a shape to extract from.
    #[error("extract path `{0}` was supplied without a schema to extract from")]
    ExtractPathWithoutSchema(String),

    /// An extraction path was supplied but is empty.
    #[error("extract path is empty")]
    EmptyExtractPath,

    /// A prompt was empty or whitespace-only.
    #[error("prompt at index {0} is empty")]
    EmptyPrompt(usize),

    /// The caller-supplied schema does not compile as JSON Schema.
    #[error("schema does not compile: {0}")]
    InvalidSchema(String),

    /// The concurrency limit must admit at least one call.
    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,

    /// The retry policy must allow at least one attempt.
    #[error("retry policy must allow at least one attempt")]
    ZeroAttempts,

    /// A shorthand field declaration failed to parse.
    #[error("invalid field declaration: {0}")]
    Shorthand(#[from] ShorthandError),
}

/// Failures reported by a [`StructuredGenerator`](crate::generator::StructuredGenerator).
///
/// The variants split into two classes: transient failures, which the
/// dispatcher retries with backoff, and terminal failures, which immediately
/// become the item's error. [`is_transient`](Self::is_transient) is the
/// single source of that classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The upstream rejected the call due to rate limiting. Transient.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The upstream reported a server-side failure. Transient when the
    /// status is 5xx-equivalent.
    #[error("upstream failure (status {status}): {message}")]
    Upstream {
        /// HTTP-equivalent status code reported by the upstream.
        status: u16,
        /// Upstream-provided failure description.
        message: String,
    },

    /// The upstream could not be reached. Transient.
    #[error("network error: {0}")]
    Network(String),

    /// The call did not complete in time. Transient.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The request itself was malformed. Terminal.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication or authorization failed. Terminal.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The upstream could not produce output conforming to the requested
    /// schema. Terminal.
    #[error("schema rejected by upstream: {0}")]
    SchemaRejected(String),

    /// Any other failure. Terminal.
    #[error("{0}")]
    Other(String),
}

impl GenerateError {
    /// Returns `true` when the failure is worth retrying with backoff.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Network(_) | Self::Timeout(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::InvalidRequest(_) | Self::Auth(_) | Self::SchemaRejected(_) | Self::Other(_) => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_network_and_timeout_are_transient() {
        assert!(GenerateError::RateLimited("429".to_string()).is_transient());
        assert!(GenerateError::Network("connection reset".to_string()).is_transient());
        assert!(GenerateError::Timeout(Duration::from_secs(30)).is_transient());
    }

    #[test]
    fn upstream_classification_follows_status_class() {
        let server = GenerateError::Upstream {
            status: 503,
            message: "overloaded".to_string(),
        };
        let client = GenerateError::Upstream {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
    }

    #[test]
    fn request_auth_and_schema_failures_are_terminal() {
        assert!(!GenerateError::InvalidRequest("missing prompt".to_string()).is_transient());
        assert!(!GenerateError::Auth("key revoked".to_string()).is_transient());
        assert!(!GenerateError::SchemaRejected("unsupported keyword".to_string()).is_transient());
        assert!(!GenerateError::Other("unclassified".to_string()).is_transient());
    }

    #[test]
    fn shorthand_errors_convert_into_config_errors() {
        let err: ConfigError = ShorthandError::Empty.into();
        assert!(matches!(err, ConfigError::Shorthand(ShorthandError::Empty)));
    }
}
