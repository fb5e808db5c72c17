//! Connection lifecycle — keeps registry membership and join/leave
//! notifications consistent.

use std::sync::Arc;

use relay_protocol::{ConnectionId, Envelope};
use relay_transport::ConnectionSender;
use tracing::{debug, info};

use crate::delivery;
use crate::registry::{ConnectionHandle, ConnectionRegistry};

/// Creates and destroys `ConnectionHandle`s. Nothing else inserts into or
/// removes from the registry; the router only requests deliveries.
pub struct LifecycleManager {
    registry: Arc<ConnectionRegistry>,
}

impl LifecycleManager {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Accept a new connection: assign a fresh id, register the handle,
    /// welcome the connection, and announce the join to everyone else.
    ///
    /// The `totalConnections` in the join notification is the registry size
    /// measured atomically with the insertion.
    pub fn register(&self, remote_addr: String, sender: ConnectionSender) -> ConnectionId {
        let id = ConnectionId::generate();
        let handle = ConnectionHandle::new(id.clone(), remote_addr.clone(), sender);

        let total = self.registry.insert(handle.clone());
        info!("connection established: {id} from {remote_addr} (total: {total})");

        delivery::send_to(&handle, &Envelope::welcome(&id));
        delivery::broadcast(&self.registry, &Envelope::user_joined(&id, total), Some(&id));

        id
    }

    /// Remove a closed or failed connection and announce the leave to all
    /// remaining connections. A second call for the same id is a no-op.
    pub fn deregister(&self, id: &ConnectionId) {
        match self.registry.remove(id) {
            Some((handle, total)) => {
                info!(
                    "connection closed: {id} from {} (total: {total})",
                    handle.remote_addr()
                );
                delivery::broadcast(&self.registry, &Envelope::user_left(id, total), None);
            }
            None => debug!("deregister for unknown connection {id}"),
        }
    }
}
