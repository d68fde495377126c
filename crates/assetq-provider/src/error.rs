//! Error types for provider communication.

use assetq_core::Provider;
use thiserror::Error;

/// Errors that can occur while fetching a page from a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection-level failure (DNS, TLS, timeout, reset)
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        /// Provider name
        provider: Provider,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Body did not match the expected schema
    #[error("failed to decode {provider} response: {message}")]
    Decode {
        /// Provider name
        provider: Provider,
        /// Decoder message
        message: String,
    },

    /// Request could not be built for this provider
    #[error("cannot encode {provider} request: {message}")]
    Encode {
        /// Provider name
        provider: Provider,
        /// What was wrong with the request
        message: String,
    },

    /// Provider reported an application-level error
    #[error("{provider} API error {code}: {message}")]
    Application {
        /// Provider name
        provider: Provider,
        /// Provider error code
        code: String,
        /// Provider error message
        message: String,
    },

    /// Provider refused to page past its hard result ceiling
    #[error("{provider} result ceiling reached")]
    CeilingReached {
        /// Provider name
        provider: Provider,
    },

    /// Page came back without rows although more were expected
    #[error("{0} returned no rows")]
    EmptyPage(String),

    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Error of the final attempt
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Whether another attempt at the same page may succeed.
    ///
    /// Provider application errors and the ceiling signal are terminal;
    /// every other failure is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Transport(_)
                | ProviderError::Status { .. }
                | ProviderError::Decode { .. }
                | ProviderError::EmptyPage(_)
        )
    }

    pub(crate) fn decode(provider: Provider, message: impl Into<String>) -> Self {
        ProviderError::Decode {
            provider,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::Transport("reset".to_string()).is_retryable());
        assert!(ProviderError::Status {
            provider: Provider::Fofa,
            status: 502,
            body: String::new(),
        }
        .is_retryable());
        assert!(ProviderError::decode(Provider::Quake, "eof").is_retryable());
        assert!(ProviderError::EmptyPage("hunter page 2".to_string()).is_retryable());

        assert!(!ProviderError::Application {
            provider: Provider::Hunter,
            code: "401".to_string(),
            message: "bad key".to_string(),
        }
        .is_retryable());
        assert!(!ProviderError::CeilingReached {
            provider: Provider::Quake
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Application {
            provider: Provider::Quake,
            code: "u3004".to_string(),
            message: "token invalid".to_string(),
        };
        assert_eq!(err.to_string(), "quake API error u3004: token invalid");

        let err = ProviderError::RetriesExhausted {
            attempts: 3,
            source: Box::new(ProviderError::Transport("timed out".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "gave up after 3 attempts: transport error: timed out"
        );
    }
}
