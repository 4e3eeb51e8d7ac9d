use thiserror::Error;

/// Error types for SQS router operations.
///
/// Covers router lifecycle misuse, the fatal queue-absence condition a listener
/// reports when it gives up, and failures reading a message's notification
/// envelope.
#[derive(Debug, Error)]
pub enum SqsRouterError {
    /// The queue a listener polls does not exist on the service.
    ///
    /// This is the only fatal listener condition: the affected listener stops
    /// polling and reports this error once through the router's fatal channel.
    #[error("queue not found: {queue_url}")]
    QueueNotFound { queue_url: String },

    #[error("router is already started")]
    AlreadyStarted,

    #[error("router is not started")]
    NotStarted,

    #[error("message has no body")]
    MissingBody,

    /// The message body is not a valid notification envelope.
    #[error("failed to parse notification envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// Error returned by a [`QueueService`](crate::client::QueueService) call.
///
/// Only the shape of the error matters to the router: a structured service
/// error carrying the service's error code, or anything else as raw text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueServiceError {
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("{0}")]
    Unstructured(String),
}

impl QueueServiceError {
    /// Creates a structured service error from the service's code and message.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        QueueServiceError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The service error code, if the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            QueueServiceError::Service { code, .. } => Some(code),
            QueueServiceError::Unstructured(_) => None,
        }
    }
}
