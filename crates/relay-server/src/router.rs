//! MessageRouter — dispatches decoded envelopes to their handlers, plus the
//! `RelayServer` glue implementing the transport's `ConnectionHooks`.

use std::sync::Arc;

use relay_protocol::{ConnectionId, Envelope};
use relay_transport::{ConnectionHooks, ConnectionSender};
use serde_json::Value;
use tracing::{debug, warn};

use crate::delivery;
use crate::lifecycle::LifecycleManager;
use crate::registry::ConnectionRegistry;

/// Routes each incoming envelope according to its kind.
///
/// The router consults the registry but never mutates membership —
/// removing a connection is the lifecycle manager's job. Every failure is
/// scoped to the triggering connection or the single affected send.
pub struct MessageRouter {
    registry: Arc<ConnectionRegistry>,
}

impl MessageRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Handle one raw text frame from `sender_id`.
    pub fn route(&self, sender_id: &ConnectionId, raw: &str) {
        let envelope = match Envelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("undecodable frame from {sender_id}: {e}");
                self.send_error(sender_id, "Invalid message format");
                return;
            }
        };

        debug!("routing {} envelope from {sender_id}", envelope.kind());
        match envelope {
            Envelope::Ping { timestamp } => self.handle_ping(sender_id, timestamp),
            Envelope::Broadcast { message, .. } => self.handle_broadcast(sender_id, message),
            Envelope::Private {
                target_id, message, ..
            } => self.handle_private(sender_id, target_id, message),
            Envelope::Echo { message, .. } => self.handle_echo(sender_id, message),
            Envelope::Unrecognized { raw } => self.acknowledge(sender_id, raw),
            // Server-to-client kinds arriving inbound get the generic
            // acknowledgement, same as any unrecognized payload.
            other => {
                let raw = other.to_value();
                self.acknowledge(sender_id, raw);
            }
        }
    }

    fn handle_ping(&self, sender_id: &ConnectionId, original_timestamp: Option<String>) {
        if let Some(handle) = self.registry.get(sender_id) {
            delivery::send_to(&handle, &Envelope::pong(original_timestamp));
        }
    }

    fn handle_broadcast(&self, sender_id: &ConnectionId, message: String) {
        let envelope = Envelope::broadcast_from(sender_id, message);
        delivery::broadcast(&self.registry, &envelope, Some(sender_id));
    }

    fn handle_private(
        &self,
        sender_id: &ConnectionId,
        target_id: Option<String>,
        message: String,
    ) {
        let target_id = target_id.unwrap_or_default();
        match self.registry.get(&ConnectionId::from(target_id.as_str())) {
            Some(target) => {
                delivery::send_to(&target, &Envelope::private_from(sender_id, message.clone()));
                // Confirmation to the sender
                if let Some(sender) = self.registry.get(sender_id) {
                    delivery::send_to(&sender, &Envelope::private_sent(target_id, message));
                }
            }
            None => {
                self.send_error(
                    sender_id,
                    format!("Target connection not found: {target_id}"),
                );
            }
        }
    }

    fn handle_echo(&self, sender_id: &ConnectionId, message: Option<String>) {
        if let Some(handle) = self.registry.get(sender_id) {
            delivery::send_to(&handle, &Envelope::echo_reply(message.unwrap_or_default()));
        }
    }

    fn acknowledge(&self, sender_id: &ConnectionId, raw: Value) {
        if let Some(handle) = self.registry.get(sender_id) {
            delivery::send_to(&handle, &Envelope::message_received(sender_id, raw));
        }
    }

    fn send_error(&self, sender_id: &ConnectionId, message: impl Into<String>) {
        if let Some(handle) = self.registry.get(sender_id) {
            delivery::send_to(&handle, &Envelope::error(message));
        }
    }
}

/// The relay server core — wires registry, router, and lifecycle together
/// behind the transport's `ConnectionHooks`.
pub struct RelayServer {
    registry: Arc<ConnectionRegistry>,
    router: MessageRouter,
    lifecycle: LifecycleManager,
}

impl RelayServer {
    pub fn new() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            router: MessageRouter::new(registry.clone()),
            lifecycle: LifecycleManager::new(registry.clone()),
            registry,
        }
    }

    /// The shared registry, for side surfaces that only need the size.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }
}

impl Default for RelayServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionHooks for RelayServer {
    fn on_open(&self, remote_addr: String, sender: ConnectionSender) -> ConnectionId {
        self.lifecycle.register(remote_addr, sender)
    }

    async fn on_message(&self, id: &ConnectionId, raw: &str) {
        self.router.route(id, raw);
    }

    fn on_close(&self, id: &ConnectionId) {
        self.lifecycle.deregister(id);
    }

    fn active_connections(&self) -> usize {
        self.registry.len()
    }
}
