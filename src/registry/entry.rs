//! Connection entry and role types
//!
//! This module defines the per-connection state stored in the registry.

use std::time::Instant;

/// Role a connection holds within the relay
///
/// A connection starts `Unassigned` and moves to `Streamer` or `Viewer`
/// exactly once; there is no transition back and no reassignment between
/// the two registered roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    /// Connected, no role registered yet
    Unassigned,
    /// The single active broadcaster
    Streamer,
    /// A watching peer
    Viewer,
}

impl ConnectionRole {
    /// Whether a role-registration has been processed for this connection
    pub fn is_assigned(&self) -> bool {
        !matches!(self, ConnectionRole::Unassigned)
    }
}

/// Entry for a single connection in the registry
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    /// Current role
    pub role: ConnectionRole,

    /// When the transport session was established
    pub connected_at: Instant,
}

impl ConnectionEntry {
    /// Create a new unassigned entry
    pub(super) fn new() -> Self {
        Self {
            role: ConnectionRole::Unassigned,
            connected_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_unassigned() {
        let entry = ConnectionEntry::new();
        assert_eq!(entry.role, ConnectionRole::Unassigned);
        assert!(!entry.role.is_assigned());
    }

    #[test]
    fn test_registered_roles_are_assigned() {
        assert!(ConnectionRole::Streamer.is_assigned());
        assert!(ConnectionRole::Viewer.is_assigned());
    }
}
