use thiserror::Error;

/// Broad classification of API failures.
///
/// Capture parameters are not validated locally, so a bad value only shows
/// up as a `ServerRejection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent or the response could not be read
    NetworkFailure,

    /// The service answered with a non-success status
    ServerRejection,
}

/// Errors returned by the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure from the HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-success status with the service's explanation
    #[error("HTTP {status} - {body}")]
    Rejected { status: u16, body: String },

    /// Local file could not be read for upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Rejected { .. } => ErrorKind::ServerRejection,
            _ => ErrorKind::NetworkFailure,
        }
    }
}

/// Errors from capture session commands
#[derive(Error, Debug)]
pub enum SessionError {
    /// A start or stop is already in flight
    #[error("another capture command is in progress")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from upload, export and clear workflows
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upload requested without a selected file
    #[error("no capture file selected")]
    NoFileSelected,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from I/O operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error building the HTTP client
    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    /// Error from terminal handling
    #[error("Terminal error: {0}")]
    TerminalError(String),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_carries_status_and_body() {
        let err = ApiError::Rejected {
            status: 400,
            body: "interface required".into(),
        };
        assert_eq!(err.to_string(), "HTTP 400 - interface required");
        assert_eq!(err.kind(), ErrorKind::ServerRejection);
    }

    #[test]
    fn decode_failure_is_a_network_failure() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    }
}
