//! Envelope kind tags carried in the wire `"type"` field.

/// All envelope kind names, grouped by direction of travel.
pub struct Kinds;

impl Kinds {
    // ── Client to server ────────────────────────────────────────────────
    pub const PING: &str = "ping";
    pub const BROADCAST: &str = "broadcast";
    pub const PRIVATE: &str = "private";
    pub const ECHO: &str = "echo";

    // ── Server to client ────────────────────────────────────────────────
    pub const PONG: &str = "pong";
    pub const WELCOME: &str = "welcome";
    pub const USER_JOINED: &str = "user_joined";
    pub const USER_LEFT: &str = "user_left";
    pub const ERROR: &str = "error";
    pub const PRIVATE_SENT: &str = "private_sent";
    pub const MESSAGE_RECEIVED: &str = "message_received";
}

/// The closed set of known kinds. Anything else decodes to the
/// unrecognized fallback.
pub const ALL_KINDS: &[&str] = &[
    Kinds::PING,
    Kinds::PONG,
    Kinds::BROADCAST,
    Kinds::PRIVATE,
    Kinds::ECHO,
    Kinds::WELCOME,
    Kinds::USER_JOINED,
    Kinds::USER_LEFT,
    Kinds::ERROR,
    Kinds::PRIVATE_SENT,
    Kinds::MESSAGE_RECEIVED,
];

pub fn is_known_kind(kind: &str) -> bool {
    ALL_KINDS.contains(&kind)
}
