//! Relay wire protocol.
//!
//! The single source of truth for the message format exchanged between the
//! relay server and its clients: envelope kind tags, the `Envelope` value
//! type, decode errors, and timestamp formatting.

pub mod connection;
pub mod envelope;
pub mod error;
pub mod kinds;
pub mod timestamp;

pub use connection::ConnectionId;
pub use envelope::Envelope;
pub use error::DecodeError;
pub use kinds::{Kinds, is_known_kind};
