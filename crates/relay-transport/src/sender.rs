//! Per-connection outbound handle.

use axum::extract::ws::Message;
use thiserror::Error;
use tokio::sync::mpsc;

/// Write side of one connection's single-writer channel.
///
/// Cloneable and usable from any task. Frames are drained by the
/// connection's writer task in queue order, so concurrent senders (the
/// connection's own handlers and other connections' broadcasts) never
/// interleave partial frames.
#[derive(Debug, Clone)]
pub struct ConnectionSender {
    tx: mpsc::UnboundedSender<Message>,
}

/// The connection's writer task is gone; the frame was dropped.
#[derive(Debug, Error)]
#[error("connection writer closed")]
pub struct SendError;

impl ConnectionSender {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    /// Queue one text frame. Fails soft once the peer has disconnected.
    pub fn send_text(&self, text: String) -> Result<(), SendError> {
        self.tx.send(Message::Text(text.into())).map_err(|_| SendError)
    }
}
