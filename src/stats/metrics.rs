//! Statistics and metrics for the signaling relay

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Relay-wide counters
///
/// Updated from the accept loop, the lifecycle manager, and the router.
/// All counters are monotonic except `connections_active`.
#[derive(Debug)]
pub struct RelayStats {
    /// Total connections ever accepted
    connections_total: AtomicU64,
    /// Currently connected transports
    connections_active: AtomicU64,
    /// Role registrations accepted
    registrations_accepted: AtomicU64,
    /// Role registrations rejected
    registrations_rejected: AtomicU64,
    /// Negotiation messages delivered to their target
    messages_relayed: AtomicU64,
    /// Negotiation messages dropped (malformed or target gone)
    messages_dropped: AtomicU64,
    /// When the relay started
    started_at: Instant,
}

impl RelayStats {
    /// Create a new stats tracker
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            connections_active: AtomicU64::new(0),
            registrations_accepted: AtomicU64::new(0),
            registrations_rejected: AtomicU64::new(0),
            messages_relayed: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub(crate) fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn registration_accepted(&self) {
        self.registrations_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn registration_rejected(&self) {
        self.registrations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_relayed(&self) {
        self.messages_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            registrations_accepted: self.registrations_accepted.load(Ordering::Relaxed),
            registrations_rejected: self.registrations_rejected.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the relay counters
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Total connections ever accepted
    pub connections_total: u64,
    /// Currently connected transports
    pub connections_active: u64,
    /// Role registrations accepted
    pub registrations_accepted: u64,
    /// Role registrations rejected
    pub registrations_rejected: u64,
    /// Negotiation messages delivered to their target
    pub messages_relayed: u64,
    /// Negotiation messages dropped (malformed or target gone)
    pub messages_dropped: u64,
    /// Time since the relay started
    pub uptime: Duration,
}
