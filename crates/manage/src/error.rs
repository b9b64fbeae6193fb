//! Error types for management API calls.
//!
//! Errors are categorized so the command layer can give the user an
//! actionable hint. Nothing in this crate retries: every request is sent
//! at most once.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for management operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of management errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The cluster could not be reached.
    Network,
    /// Credentials were rejected.
    Auth,
    /// The cluster answered with an unexpected status.
    Status,
    /// The response could not be parsed.
    Format,
    /// Local file access failed.
    Io,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Cluster unreachable",
            Self::Auth => "Authentication failed",
            Self::Status => "Request rejected by the cluster",
            Self::Format => "Unexpected response format",
            Self::Io => "Local file error",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the host and ports in the `connect` section",
            Self::Auth => {
                "Check the user and password; only basic auth is sent, so the Manage and REST app servers must use `basic` or `digestbasic` authentication"
            }
            Self::Status => "Inspect the error message; the cluster may be partially converged",
            Self::Format => "Check that the ports point to the Management and REST APIs",
            Self::Io => "Check that the files exist and are readable",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur when talking to the cluster.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (DNS, connection refused, TLS...).
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
    },

    /// The cluster answered with a status the caller does not accept.
    #[error("{request} returned {status}{}", message_suffix(.message))]
    Status {
        /// The request, as `verb api url`.
        request: String,
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, if any.
        message: Option<String>,
    },

    /// Invalid response body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// IO error while reading a document to upload.
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// No scripted answer in a mock backend.
    #[error("{0}")]
    Other(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a status error.
    pub fn status(request: impl Into<String>, status: u16, message: Option<String>) -> Self {
        Self::Status {
            request: request.into(),
            status,
            message,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { .. } => ErrorCategory::Network,
            Error::Status { status, .. } => {
                if *status == 401 || *status == 403 {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::Status
                }
            }
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Io { .. } => ErrorCategory::Io,
            Error::Other(_) => ErrorCategory::Other,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Self::Http {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_description() {
        assert!(!ErrorCategory::Network.description().is_empty());
        assert!(!ErrorCategory::Auth.description().is_empty());
        assert!(!ErrorCategory::Status.description().is_empty());
    }

    #[test]
    fn test_error_category_advice() {
        assert!(!ErrorCategory::Network.advice().is_empty());
        assert!(!ErrorCategory::Auth.advice().is_empty());
        assert!(!ErrorCategory::Io.advice().is_empty());
    }

    #[test]
    fn test_auth_advice_names_supported_schemes() {
        let err = Error::status("get manage /databases/content/properties", 401, None);
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.category().advice().contains("digestbasic"));
    }

    #[test]
    fn test_error_category_display() {
        let display = format!("{}", ErrorCategory::Network);
        assert!(display.contains("unreachable"));
    }

    #[test]
    fn test_status_error_category() {
        let err = Error::status("get manage /databases", 500, None);
        assert_eq!(err.category(), ErrorCategory::Status);

        let err = Error::status("get manage /databases", 401, None);
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_status_error_display() {
        let err = Error::status(
            "post manage /databases",
            400,
            Some("XDMP-BADNAME".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "post manage /databases returned 400: XDMP-BADNAME"
        );

        let err = Error::status("post manage /databases", 500, None);
        assert_eq!(err.to_string(), "post manage /databases returned 500");
    }

    #[test]
    fn test_io_error_constructor() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/some/path", io_err);
        match &err {
            Error::Io { path, .. } => assert_eq!(path, &PathBuf::from("/some/path")),
            _ => panic!("Expected Error::Io"),
        }
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert_eq!(err.category(), ErrorCategory::Format);
    }
}
