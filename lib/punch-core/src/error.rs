//! Error types for punch.
//!
//! Every failure surfaces as an [`Error`]. [`Error::kind`] groups the variants
//! so callers can tell "the request never went out" from "the exchange failed"
//! from "the response could not be read".

use derive_more::{Display, Error, From};

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// The request could not be built; nothing was sent.
    #[display("construction")]
    Construction,
    /// The request was built but the exchange with the server failed.
    #[display("dispatch")]
    Dispatch,
    /// The response arrived but its body could not be read or decoded.
    #[display("decode")]
    Decode,
    /// A response wrapper held neither a response nor an error.
    #[display("missing response")]
    MissingResponse,
    /// A response wrapper held a response without a body stream.
    #[display("missing body")]
    MissingBody,
}

/// Main error type for punch operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum Error {
    /// No execution context was supplied.
    #[display("invalid context: no execution context supplied")]
    #[from(skip)]
    InvalidContext,

    /// Invalid request configuration (method token, header name or value).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from(skip)]
    JsonSerialization(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The client timeout elapsed.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The execution context was cancelled.
    #[display("context canceled")]
    #[from(skip)]
    Canceled,

    /// The execution context deadline passed.
    #[display("context deadline exceeded")]
    #[from(skip)]
    DeadlineExceeded,

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Reading the response body failed.
    #[display("I/O error: {_0}")]
    #[from(skip)]
    Io(#[error(not(source))] String),

    /// The response body is not valid UTF-8 text.
    #[display("invalid UTF-8 in response body: {_0}")]
    #[from(skip)]
    InvalidUtf8(#[error(not(source))] String),

    /// The response wrapper holds no response.
    #[display("response is nil")]
    #[from(skip)]
    NilResponse,

    /// The response carries no body stream.
    #[display("body is nil")]
    #[from(skip)]
    NilBody,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a body read error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidContext
            | Self::InvalidRequest(_)
            | Self::InvalidUrl(_)
            | Self::JsonSerialization(_) => ErrorKind::Construction,
            Self::Connection(_)
            | Self::Tls(_)
            | Self::Timeout
            | Self::Canceled
            | Self::DeadlineExceeded => ErrorKind::Dispatch,
            Self::JsonDeserialization { .. } | Self::Io(_) | Self::InvalidUtf8(_) => {
                ErrorKind::Decode
            }
            Self::NilResponse => ErrorKind::MissingResponse,
            Self::NilBody => ErrorKind::MissingBody,
        }
    }

    /// Returns `true` if the client timeout or the context deadline elapsed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout | Self::DeadlineExceeded)
    }

    /// Returns `true` if the context was cancelled.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Self::Io(err.to_string());
        }
        Self::JsonSerialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(Error::Timeout.to_string(), "request timeout");
        assert_eq!(Error::NilResponse.to_string(), "response is nil");
        assert_eq!(Error::NilBody.to_string(), "body is nil");
        assert_eq!(Error::Canceled.to_string(), "context canceled");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_kinds() {
        assert_eq!(Error::InvalidContext.kind(), ErrorKind::Construction);
        assert_eq!(
            Error::from(url::ParseError::EmptyHost).kind(),
            ErrorKind::Construction
        );
        assert_eq!(Error::connection("refused").kind(), ErrorKind::Dispatch);
        assert_eq!(Error::DeadlineExceeded.kind(), ErrorKind::Dispatch);
        assert_eq!(Error::io("reset").kind(), ErrorKind::Decode);
        assert_eq!(
            Error::json_deserialization("id", "invalid type").kind(),
            ErrorKind::Decode
        );
        assert_eq!(Error::NilResponse.kind(), ErrorKind::MissingResponse);
        assert_eq!(Error::NilBody.kind(), ErrorKind::MissingBody);
    }

    #[test]
    fn error_is_timeout() {
        assert!(Error::Timeout.is_timeout());
        assert!(Error::DeadlineExceeded.is_timeout());
        assert!(!Error::Canceled.is_timeout());
        assert!(Error::Canceled.is_canceled());
    }

    #[test]
    fn error_is_connection() {
        assert!(Error::connection("failed").is_connection());
        assert!(!Error::Timeout.is_connection());
    }

    #[test]
    fn io_error_conversion() {
        let err = Error::from(std::io::Error::other("disk full"));
        assert_eq!(err, Error::io("disk full"));
    }
}
