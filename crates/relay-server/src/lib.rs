//! Relay server core — connection registry, message router, and lifecycle.
//!
//! Owns every invariant of the relay: connection identity, membership
//! consistency under concurrent join/leave/send, and best-effort delivery
//! semantics. Plugs into the transport via its `ConnectionHooks` trait.

pub mod delivery;
pub mod lifecycle;
pub mod registry;
pub mod router;

pub use lifecycle::LifecycleManager;
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use router::{MessageRouter, RelayServer};
