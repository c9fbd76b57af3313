#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Whether a remote failure happened on the wire or was reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure: DNS, TLS, connection reset, timeout.
    Network,
    /// The server answered with a non-2xx status or an unreadable body.
    Server,
}

/// A failed remote call as seen by the state machines.
///
/// Mirrors the `{ message, status }` shape every endpoint produces on
/// failure. Transport-specific error types are converted into this by the
/// client crate so that `core` stays free of HTTP dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: FailureKind,
    pub message: String,
    /// HTTP status code, when the server answered at all.
    pub status: Option<u16>,
}

impl RemoteFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            message: message.into(),
            status: None,
        }
    }

    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Server,
            message: message.into(),
            status,
        }
    }
}

impl std::fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RemoteFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_when_present() {
        let failure = RemoteFailure::server(Some(503), "Service unavailable");
        assert_eq!(failure.to_string(), "Service unavailable (HTTP 503)");
    }

    #[test]
    fn display_network_failure_has_no_status() {
        let failure = RemoteFailure::network("connection refused");
        assert_eq!(failure.kind, FailureKind::Network);
        assert_eq!(failure.to_string(), "connection refused");
    }

    #[test]
    fn validation_error_message() {
        let err = CoreError::Validation("invalid price range".to_string());
        assert_eq!(err.to_string(), "Validation failed: invalid price range");
    }
}
