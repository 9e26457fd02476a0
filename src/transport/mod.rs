//! Transport fan-out for connected sessions
//!
//! The hub owns one outbound channel per connected transport session and
//! exposes addressable delivery (`send_to`) and whole-relay broadcast
//! (`broadcast_all`). Delivery to a departed connection is a no-op.

pub mod hub;

pub use hub::ConnectionHub;
