//! Domain Errors
//!
//! `ClientError` is what a resource client port reports. `DashboardError`
//! is the taxonomy the application layer turns into operator messages.

/// Failure reported by a [`ResourceClient`](crate::domain::ports::ResourceClient).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Network(String),
    /// The admin API answered with a non-2xx status.
    #[error("request rejected: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Failure of a dashboard operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("request rejected with status {status}: {body}")]
    RequestRejected { status: u16, body: String },
    /// Local validation; nothing was sent.
    #[error("{0}")]
    ValidationFailure(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailure(message.into())
    }

    /// True when the error was raised before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailure(_))
    }
}

impl From<ClientError> for DashboardError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) => Self::NetworkFailure(msg),
            ClientError::Rejected { status, body } => Self::RequestRejected { status, body },
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_from_network_error() {
        let err: DashboardError = ClientError::Network("connection refused".to_string()).into();
        assert_eq!(
            err,
            DashboardError::NetworkFailure("connection refused".to_string())
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_rejected_error() {
        let err: DashboardError = ClientError::Rejected {
            status: 400,
            body: "bad".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DashboardError::RequestRejected { status: 400, .. }
        ));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = DashboardError::validation("ID and Node are required");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "ID and Node are required");
    }
}
