//! ConnectionRegistry — the authoritative set of live connections.

use std::collections::HashMap;

use parking_lot::RwLock;
use relay_protocol::{ConnectionId, Envelope};
use relay_transport::{ConnectionSender, SendError};

/// One registered connection: its id, where it came from, and the write
/// side of its single-writer channel.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    /// Peer address, for diagnostics only.
    remote_addr: String,
    sender: ConnectionSender,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, remote_addr: String, sender: ConnectionSender) -> Self {
        Self {
            id,
            remote_addr,
            sender,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Best-effort send of one envelope. An error means the peer's writer
    /// task is gone and the frame was dropped.
    pub fn send(&self, envelope: &Envelope) -> Result<(), SendError> {
        self.sender.send_text(envelope.to_json())
    }
}

/// Thread-safe id → handle map.
///
/// Membership changes return the size measured under the same write lock,
/// so the `totalConnections` reported in join/leave notifications is exact
/// at the moment of the change. No raw iteration over internal storage is
/// exposed; broadcast consumers work from snapshots.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handle, returning the registry size including the new
    /// entry. Ids are generated uniquely; a duplicate overwrites.
    pub fn insert(&self, handle: ConnectionHandle) -> usize {
        let mut connections = self.connections.write();
        connections.insert(handle.id.clone(), handle);
        connections.len()
    }

    /// Remove by id, returning the handle and the remaining size.
    pub fn remove(&self, id: &ConnectionId) -> Option<(ConnectionHandle, usize)> {
        let mut connections = self.connections.write();
        let handle = connections.remove(id)?;
        Some((handle, connections.len()))
    }

    pub fn get(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.read().get(id).cloned()
    }

    /// Point-in-time view of all handles, optionally excluding one id.
    /// Each registered handle appears exactly once.
    pub fn snapshot_excluding(&self, exclude: Option<&ConnectionId>) -> Vec<ConnectionHandle> {
        self.connections
            .read()
            .values()
            .filter(|handle| Some(&handle.id) != exclude)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
