//! Connection registry for relay routing
//!
//! The registry tracks every connected transport session and enforces the
//! single-streamer invariant: at most one connection holds the streamer
//! role at any time.
//!
//! # Architecture
//!
//! ```text
//!                     Arc<ConnectionRegistry>
//!                 ┌────────────────────────────┐
//!                 │ connections: HashMap<      │
//!                 │   ConnectionId,            │
//!                 │   ConnectionEntry { role } │
//!                 │ >                          │
//!                 │ streamer: Option<Id>       │
//!                 └─────────────┬──────────────┘
//!                               │
//!          ┌────────────────────┼────────────────────┐
//!          │                    │                    │
//!          ▼                    ▼                    ▼
//!     [Streamer]            [Viewer]             [Viewer]
//!     register()            register()           register()
//!          │                    │                    │
//!          └──► one slot, first come ── later requests rejected
//! ```
//!
//! Admission and departure decisions are computed while the registry lock
//! is held and returned to the caller, so the notification fan-out that
//! follows is based on a consistent snapshot.

pub mod entry;
pub mod error;
pub mod ident;
pub mod store;

pub use entry::{ConnectionEntry, ConnectionRole};
pub use error::RegistryError;
pub use ident::ConnectionId;
pub use store::{Admission, ConnectionRegistry, Departure};
