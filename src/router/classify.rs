use crate::client::NO_CREDENTIALS_CODE;
use crate::errors::QueueServiceError;

/// Error codes meaning the polled queue does not exist.
const QUEUE_NOT_FOUND_CODES: &[&str] = &[
    "AWS.SimpleQueueService.NonExistentQueue",
    "QueueDoesNotExist",
];

/// Error codes meaning no valid credentials were available for the request.
const CREDENTIAL_CODES: &[&str] = &[
    NO_CREDENTIALS_CODE,
    "ExpiredToken",
    "ExpiredTokenException",
    "InvalidClientTokenId",
    "UnrecognizedClientException",
    "MissingAuthenticationToken",
];

/// How a listener reacts to a failed poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// The queue does not exist. Fatal for the listener.
    QueueNotFound,
    /// Credentials are missing or expired. Retried on the next iteration.
    Unauthorized,
    /// Any other error reported by the service. Retried on the next iteration.
    Service { code: String, message: String },
    /// An error that did not come from the service. Retried on the next iteration.
    Unknown(String),
}

impl ErrorClass {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorClass::QueueNotFound)
    }
}

pub fn classify(err: &QueueServiceError) -> ErrorClass {
    match err {
        QueueServiceError::Service { code, .. }
            if QUEUE_NOT_FOUND_CODES.contains(&code.as_str()) =>
        {
            ErrorClass::QueueNotFound
        }
        QueueServiceError::Service { code, .. } if CREDENTIAL_CODES.contains(&code.as_str()) => {
            ErrorClass::Unauthorized
        }
        QueueServiceError::Service { code, message } => ErrorClass::Service {
            code: code.clone(),
            message: message.clone(),
        },
        QueueServiceError::Unstructured(text) => ErrorClass::Unknown(text.clone()),
    }
}
