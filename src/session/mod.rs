//! Session lifecycle management
//!
//! Reacts to transport events: creates registry entries on connect,
//! enforces the single-streamer invariant on registration, routes
//! negotiation payloads, and fans out join/leave/stop notifications on
//! disconnect. One event is handled to completion before the next event
//! from the same connection is read.

pub mod event;
pub mod lifecycle;

pub use event::TransportEvent;
pub use lifecycle::SessionLifecycle;
