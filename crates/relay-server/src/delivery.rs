//! Best-effort envelope delivery.
//!
//! A failed send means the recipient disconnected mid-flight. It is logged
//! and skipped — never escalated, never surfaced to the original sender.

use relay_protocol::{ConnectionId, Envelope};
use tracing::{debug, warn};

use crate::registry::{ConnectionHandle, ConnectionRegistry};

/// Send one envelope to one connection, failing soft.
pub fn send_to(handle: &ConnectionHandle, envelope: &Envelope) {
    if handle.send(envelope).is_err() {
        warn!(
            "dropped {} envelope for {}: connection writer gone",
            envelope.kind(),
            handle.id()
        );
    }
}

/// Fan an envelope out to every registered connection except `exclude`.
///
/// Recipients are independent: one unreachable connection never stalls or
/// fails delivery to the rest.
pub fn broadcast(
    registry: &ConnectionRegistry,
    envelope: &Envelope,
    exclude: Option<&ConnectionId>,
) {
    let recipients = registry.snapshot_excluding(exclude);
    debug!(
        "broadcasting {} envelope to {} connections",
        envelope.kind(),
        recipients.len()
    );
    for handle in &recipients {
        send_to(handle, envelope);
    }
}
