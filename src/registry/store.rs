//! Connection registry implementation
//!
//! The central registry that tracks every connected transport session,
//! the role each one registered, and the single active streamer slot.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::entry::{ConnectionEntry, ConnectionRole};
use super::error::RegistryError;
use super::ident::ConnectionId;
use crate::protocol::Role;

/// Outcome of an accepted registration
///
/// Snapshot data is captured while the registry lock is held, so the
/// caller's notification decision belongs to the same atomic unit as the
/// registry mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The requester now holds the streamer slot.
    Streamer,
    /// The requester is registered as a viewer; `streamer` is the slot
    /// content at decision time.
    Viewer {
        /// Current streamer, if one is registered
        streamer: Option<ConnectionId>,
    },
}

/// Outcome of removing a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Role the connection held, or `None` if the identifier was unknown
    pub role: Option<ConnectionRole>,

    /// Whether the departed connection held the streamer slot
    pub was_streamer: bool,

    /// Streamer slot content after the removal
    pub streamer: Option<ConnectionId>,
}

/// Central registry for all connected transport sessions
///
/// Thread-safe via a single `RwLock`. Every check-and-mutate pair runs
/// under one write guard, so two connections racing for the streamer slot
/// cannot both win and a disconnect cannot interleave with a registration.
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    /// Map of connection identifier to entry
    connections: HashMap<ConnectionId, ConnectionEntry>,

    /// Identifier of the current streamer, if one is registered
    streamer: Option<ConnectionId>,
}

impl ConnectionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Add a connection with an unassigned role
    ///
    /// Called when the transport session is established, before any
    /// protocol message is processed.
    pub async fn insert(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;

        tracing::debug!(connection = %id, "Connection added to registry");
        inner.connections.insert(id, ConnectionEntry::new());
    }

    /// Register a role for a connection
    ///
    /// A streamer request is accepted iff the slot is free or already held
    /// by the requester (idempotent re-register). A viewer request is
    /// accepted for any connection that has not registered as streamer.
    /// Role reassignment is refused; the existing streamer slot is never
    /// changed by a rejected request.
    pub async fn register(
        &self,
        id: &ConnectionId,
        role: Role,
    ) -> Result<Admission, RegistryError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let entry = match inner.connections.get_mut(id) {
            Some(entry) => entry,
            None => return Err(RegistryError::NotConnected(id.clone())),
        };

        match role {
            Role::Streamer => {
                if entry.role == ConnectionRole::Viewer {
                    return Err(RegistryError::RoleAlreadyAssigned(id.clone()));
                }

                if let Some(current) = &inner.streamer {
                    if current != id {
                        return Err(RegistryError::StreamerActive(current.clone()));
                    }
                }

                entry.role = ConnectionRole::Streamer;
                inner.streamer = Some(id.clone());

                tracing::info!(connection = %id, "Streamer registered");
                Ok(Admission::Streamer)
            }
            Role::Viewer => {
                if entry.role == ConnectionRole::Streamer {
                    return Err(RegistryError::RoleAlreadyAssigned(id.clone()));
                }

                entry.role = ConnectionRole::Viewer;

                tracing::info!(
                    connection = %id,
                    streamer = inner.streamer.is_some(),
                    "Viewer registered"
                );
                Ok(Admission::Viewer {
                    streamer: inner.streamer.clone(),
                })
            }
        }
    }

    /// Remove a connection
    ///
    /// Clears the streamer slot when the departed connection held it; the
    /// caller is responsible for the stop notification in that case.
    pub async fn remove(&self, id: &ConnectionId) -> Departure {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let role = inner.connections.remove(id).map(|entry| entry.role);

        let was_streamer = inner.streamer.as_ref() == Some(id);
        if was_streamer {
            inner.streamer = None;
            tracing::info!(connection = %id, "Streamer removed, slot cleared");
        } else if role.is_some() {
            tracing::debug!(connection = %id, role = ?role, "Connection removed from registry");
        }

        Departure {
            role,
            was_streamer,
            streamer: inner.streamer.clone(),
        }
    }

    /// Identifier of the current streamer, if one is registered
    pub async fn current_streamer(&self) -> Option<ConnectionId> {
        self.inner.read().await.streamer.clone()
    }

    /// Role registered for a connection
    pub async fn role_of(&self, id: &ConnectionId) -> Option<ConnectionRole> {
        self.inner
            .read()
            .await
            .connections
            .get(id)
            .map(|entry| entry.role)
    }

    /// Whether the identifier is a connected transport session
    pub async fn contains(&self, id: &ConnectionId) -> bool {
        self.inner.read().await.connections.contains_key(id)
    }

    /// Number of connected transport sessions
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
