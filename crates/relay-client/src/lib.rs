//! Relay interactive client.
//!
//! Pairs one outbound command stream with one inbound envelope stream over
//! a single connection, and owns the reconnect policy.

pub mod commands;
pub mod display;
pub mod session;

pub use commands::Command;
pub use session::{ClientSession, RECONNECT_DELAY};
