//! Error types for remotecheck

use std::fmt;

/// Result type alias for remotecheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for remotecheck
#[derive(Debug)]
pub enum Error {
    /// HTTP transport errors
    Http(reqwest::Error),
    /// The remote endpoint answered with a non-success status
    Status { status: u16, body: String },
    /// Protobuf encoding errors
    Encode(prost::EncodeError),
    /// Protobuf decoding errors
    Decode(prost::DecodeError),
    /// Snappy compression errors
    Compression(snap::Error),
    /// Decompressed payload would exceed the configured limit
    PayloadTooLarge { size: usize, limit: usize },
    /// IO errors
    Io(std::io::Error),
    /// Protobuf schema could not be compiled
    Schema(String),
    /// Selector or read query is invalid
    InvalidQuery(String),
    /// Write request failed validation
    InvalidWrite(String),
    /// Requested feature is not supported
    Unsupported(String),
    /// Missing or wrong credentials
    Unauthorized,
    /// Configuration errors
    Config(String),
    /// Timeout
    Timeout,
    /// A correctness check did not hold
    CheckFailed(String),
    /// Internal error
    Internal(String),
}

impl Error {
    /// HTTP status of a request the remote side rejected.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Decode(_)
                | Error::Compression(_)
                | Error::PayloadTooLarge { .. }
                | Error::InvalidQuery(_)
                | Error::InvalidWrite(_)
                | Error::Unsupported(_)
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Compression(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "Remote returned status {}", status)
                } else {
                    write!(f, "Remote returned status {}: {}", status, body)
                }
            }
            Error::Encode(e) => write!(f, "Protobuf encode error: {}", e),
            Error::Decode(e) => write!(f, "Protobuf decode error: {}", e),
            Error::Compression(e) => write!(f, "Snappy error: {}", e),
            Error::PayloadTooLarge { size, limit } => {
                write!(f, "Payload too large: {} bytes exceeds limit of {}", size, limit)
            }
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Schema(msg) => write!(f, "Schema error: {}", msg),
            Error::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            Error::InvalidWrite(msg) => write!(f, "Invalid write: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::Unauthorized => write!(f, "Unauthorized"),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::CheckFailed(msg) => write!(f, "Check failed: {}", msg),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Error::Timeout;
        }
        Error::Http(e)
    }
}

impl From<prost::EncodeError> for Error {
    fn from(e: prost::EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<snap::Error> for Error {
    fn from(e: snap::Error) -> Self {
        Error::Compression(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidQuery(format!("invalid regex: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_exposed() {
        let err = Error::Status {
            status: 400,
            body: "missing labels".to_string(),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Remote returned status 400: missing labels");
        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidWrite("x".into()).is_client_error());
        assert!(Error::PayloadTooLarge { size: 2, limit: 1 }.is_client_error());
        assert!(!Error::Internal("x".into()).is_client_error());
        assert!(!Error::Unauthorized.is_client_error());
    }
}
