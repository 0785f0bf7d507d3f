//! Error types for the cdnconf client
//!
//! Errors fall into two tiers:
//!
//! - **Local validation** (`MissingService`, `MissingVersion`, `MissingName`):
//!   raised before any request is built. Checked in that fixed order.
//! - **Remote**: a non-success response from the API, carrying the server's
//!   message and status.
//!
//! Errors are compared by [`ErrorKind`], never by identity.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for cdnconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the cdnconf client
#[derive(Error, Debug)]
pub enum Error {
    /// The service ID was empty
    #[error("missing required field: service")]
    MissingService,

    /// The version number was empty
    #[error("missing required field: version")]
    MissingVersion,

    /// The resource name was empty
    #[error("missing required field: name")]
    MissingName,

    /// The API answered with a non-success status
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Human-readable message from the server
        message: String,
        /// Optional extra detail from the server
        detail: Option<String>,
    },

    /// The request never produced a response (connection, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A success response whose body did not match the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Tag identifying the kind of an [`Error`]
///
/// Two errors of the same kind compare equal here even when they were
/// constructed independently or carry different messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingService,
    MissingVersion,
    MissingName,
    /// 404 from the API
    NotFound,
    /// 401 or 403 from the API
    Unauthorized,
    /// 429 from the API
    RateLimited,
    /// 5xx from the API
    ServerError,
    /// Any other non-success status
    Remote,
    Transport,
    Json,
    Config,
    UnexpectedResponse,
    Other,
}

/// Error body returned by the API on non-success responses
#[derive(Debug, Default, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an unexpected-response error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Create a remote error from a status and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Decode a non-success response body into a remote error
    ///
    /// The API sends `{"msg": ..., "detail": ...}`. Bodies that are not JSON
    /// (proxies, load balancers) fall back to a message derived from the
    /// status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: RemoteErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed
            .msg
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_status_message(status).to_string());

        Self::Remote {
            status,
            message,
            detail: parsed.detail.filter(|d| !d.is_empty()),
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingService => ErrorKind::MissingService,
            Error::MissingVersion => ErrorKind::MissingVersion,
            Error::MissingName => ErrorKind::MissingName,
            Error::Remote { status, .. } => match status {
                404 => ErrorKind::NotFound,
                401 | 403 => ErrorKind::Unauthorized,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::ServerError,
                _ => ErrorKind::Remote,
            },
            Error::Transport(_) => ErrorKind::Transport,
            Error::Json(_) => ErrorKind::Json,
            Error::Config(_) => ErrorKind::Config,
            Error::UnexpectedResponse(_) => ErrorKind::UnexpectedResponse,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// True for the three local validation errors
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingService | Error::MissingVersion | Error::MissingName
        )
    }

    /// True when the API reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// HTTP status of a remote error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Authentication failed: invalid API key",
        403 => "Forbidden: API key lacks permission for this service",
        404 => "Record not found",
        409 => "Conflict",
        429 => "Rate limit exceeded",
        500..=599 => "Server error",
        _ => "Request failed",
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_body_decoded() {
        let err = Error::from_response(
            404,
            r#"{"msg":"Record not found","detail":"Couldn't find Domain 'nope'"}"#,
        );

        match &err {
            Error::Remote {
                status,
                message,
                detail,
            } => {
                assert_eq!(*status, 404);
                assert_eq!(message, "Record not found");
                assert_eq!(detail.as_deref(), Some("Couldn't find Domain 'nope'"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_non_json_body_falls_back_to_status_message() {
        let err = Error::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.to_string(), "Remote error (502): Server error");
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(Error::remote(401, "x").kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::remote(403, "x").kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::remote(429, "x").kind(), ErrorKind::RateLimited);
        assert_eq!(Error::remote(409, "x").kind(), ErrorKind::Remote);
        assert_eq!(Error::remote(409, "x").status(), Some(409));
    }

    #[test]
    fn test_kinds_compare_by_kind_not_identity() {
        let a = Error::MissingService;
        let b = Error::MissingService;
        assert_eq!(a.kind(), b.kind());
        assert_ne!(a.kind(), Error::MissingVersion.kind());
        assert_eq!(
            Error::remote(404, "one").kind(),
            Error::remote(404, "two").kind()
        );
    }

    #[test]
    fn test_validation_errors_have_no_status() {
        for err in [Error::MissingService, Error::MissingVersion, Error::MissingName] {
            assert!(err.is_validation());
            assert_eq!(err.status(), None);
        }
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err: Error = anyhow::anyhow!("bucket lookup failed").into();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "bucket lookup failed");
    }
}
