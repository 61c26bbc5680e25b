//! Error types for Braid-HTTP streaming.

use std::io;
use thiserror::Error;

/// Result type for Braid-HTTP operations.
pub type Result<T> = std::result::Result<T, BraidError>;

/// Errors that can occur while framing or transmitting a subscription.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BraidError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Header parse error: {0}")]
    HeaderParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BraidError {
    /// Whether this error means the peer is gone.
    ///
    /// The writer loop treats these the same as a disconnect notification.
    #[inline]
    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        match self {
            BraidError::TransportClosed => true,
            BraidError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_closed_is_disconnect() {
        assert!(BraidError::TransportClosed.is_disconnect());
    }

    #[test]
    fn test_broken_pipe_is_disconnect() {
        let err = BraidError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(err.is_disconnect());
    }

    #[test]
    fn test_config_error_is_not_disconnect() {
        let err = BraidError::Config("heartbeat must be positive".into());
        assert!(!err.is_disconnect());
        assert_eq!(
            err.to_string(),
            "Configuration error: heartbeat must be positive"
        );
    }
}
