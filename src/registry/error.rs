//! Registry error types
//!
//! Error types for connection registry operations. None of these are fatal:
//! the lifecycle manager translates them into protocol responses.

use super::ident::ConnectionId;

/// Error type for registry operations
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// Another connection already holds the streamer slot
    StreamerActive(ConnectionId),
    /// The connection already registered a different role
    RoleAlreadyAssigned(ConnectionId),
    /// The identifier is not a connected transport session
    NotConnected(ConnectionId),
}

impl RegistryError {
    /// Reason string carried in the `streamer-rejected` protocol message
    pub fn reason(&self) -> &'static str {
        match self {
            RegistryError::StreamerActive(_) => "A streamer is already active",
            RegistryError::RoleAlreadyAssigned(_) => "Role already assigned",
            RegistryError::NotConnected(_) => "Not connected",
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::StreamerActive(id) => {
                write!(f, "Streamer slot held by another connection: {}", id)
            }
            RegistryError::RoleAlreadyAssigned(id) => {
                write!(f, "Connection already registered a role: {}", id)
            }
            RegistryError::NotConnected(id) => write!(f, "Connection not registered: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}
