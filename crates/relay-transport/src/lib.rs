//! Relay transport layer.
//!
//! Axum WebSocket transport on the server side, a tokio-tungstenite
//! connector on the client side. The transport handles:
//! - HTTP upgrade on the relay path (any other path is refused)
//! - one single-writer task per connection, fed by `ConnectionSender`
//! - the health endpoint and optional static file serving
//!
//! The transport is decoupled from the relay core via the `ConnectionHooks`
//! trait.

pub mod client;
pub mod sender;
pub mod server;

pub use client::{ClientConfig, ClientStream};
pub use sender::{ConnectionSender, SendError};
pub use server::{ConnectionHooks, TransportConfig, TransportServer, WEBSOCKET_PATH};
