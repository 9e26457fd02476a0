//! Crate-level error types
//!
//! Covers transport-level failures only. Relay policy outcomes
//! (rejections, unroutable payloads, absent streamers) are ordinary
//! protocol messages and never surface here.

use tokio_tungstenite::tungstenite;

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for server and transport operations
#[derive(Debug)]
pub enum Error {
    /// Socket or bind failure
    Io(std::io::Error),
    /// WebSocket protocol failure
    WebSocket(tungstenite::Error),
    /// Outbound message serialization failure
    Protocol(serde_json::Error),
    /// WebSocket handshake did not complete in time
    HandshakeTimeout,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            Error::Protocol(e) => write!(f, "Serialization error: {}", e),
            Error::HandshakeTimeout => write!(f, "WebSocket handshake timed out"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::WebSocket(e) => Some(e),
            Error::Protocol(e) => Some(e),
            Error::HandshakeTimeout => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<tungstenite::Error> for Error {
    fn from(e: tungstenite::Error) -> Self {
        Error::WebSocket(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Protocol(e)
    }
}
