use catalog_core::error::RemoteFailure;

/// Message used when a failed response carries no `message` of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

/// Errors from the catalog REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A success response whose body could not be decoded.
    #[error("Malformed response body ({status}): {source}")]
    Decode {
        /// HTTP status code of the response.
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The service returned a non-2xx status code.
    #[error("Catalog API error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// The body's `message`, or [`GENERIC_FAILURE_MESSAGE`].
        message: String,
    },
}

impl ApiError {
    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Decode { status, .. } | Self::Server { status, .. } => Some(*status),
        }
    }

    /// Convert into the transport-agnostic `{ message, status }` failure
    /// carried by the core state machines.
    ///
    /// A body that failed to decode counts as a server failure; every
    /// request error (including timeouts) is a network failure.
    pub fn to_failure(&self) -> RemoteFailure {
        match self {
            Self::Request(err) => RemoteFailure::network(err.to_string()),
            Self::Decode { status, source } => {
                RemoteFailure::server(Some(*status), format!("Malformed response: {source}"))
            }
            Self::Server { status, message } => RemoteFailure::server(Some(*status), message.clone()),
        }
    }
}

/// Errors raised while loading [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error(transparent)]
    Core(#[from] catalog_core::error::CoreError),
}
