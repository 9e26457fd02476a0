//! Negotiation message router
//!
//! Forwards the three relay payload kinds (`offer`, `answer`,
//! `ice-candidate`) to their target connection, tagged with the sender's
//! identifier. Bodies are opaque; the router validates only that a target
//! is present.

pub mod relay;

pub use relay::MessageRouter;
