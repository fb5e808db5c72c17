//! The `Envelope` — one typed JSON message unit on the wire.
//!
//! Envelopes are immutable values constructed fresh per send. The wire shape
//! is `{"type": "<kind>", ...kind-specific fields, "timestamp": "<ISO-8601
//! local>"}`; field names are fixed for interoperability and must not drift.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connection::ConnectionId;
use crate::error::DecodeError;
use crate::kinds::{Kinds, is_known_kind};
use crate::timestamp;

/// Welcome text sent to every connection right after registration.
pub const WELCOME_MESSAGE: &str = "Connected to WebSocket server";

/// The closed set of message kinds, tagged by the wire `"type"` field.
///
/// Client-originated kinds (`ping`, `broadcast`, `private`, `echo`) decode
/// leniently: a missing `message` defaults to empty, matching what clients
/// in the wild actually send. Server-originated kinds carry all of their
/// fields, always.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    Ping {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    Pong {
        timestamp: String,
        #[serde(
            rename = "originalTimestamp",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        original_timestamp: Option<String>,
    },
    Broadcast {
        /// Sender id; absent on the client-to-server leg.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    Private {
        /// Sender id; absent on the client-to-server leg.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        /// Addressee; present on the client-to-server leg.
        #[serde(rename = "targetId", default, skip_serializing_if = "Option::is_none")]
        target_id: Option<String>,
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    Echo {
        /// What the client asked to have echoed (inbound leg).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        /// The echoed payload (outbound leg).
        #[serde(
            rename = "originalMessage",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        original_message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
    },
    Welcome {
        #[serde(rename = "connectionId")]
        connection_id: String,
        timestamp: String,
        message: String,
    },
    UserJoined {
        #[serde(rename = "connectionId")]
        connection_id: String,
        timestamp: String,
        #[serde(rename = "totalConnections")]
        total_connections: usize,
    },
    UserLeft {
        #[serde(rename = "connectionId")]
        connection_id: String,
        timestamp: String,
        #[serde(rename = "totalConnections")]
        total_connections: usize,
    },
    Error {
        message: String,
        timestamp: String,
    },
    PrivateSent {
        #[serde(rename = "targetId")]
        target_id: String,
        message: String,
        timestamp: String,
    },
    MessageReceived {
        #[serde(rename = "connectionId")]
        connection_id: String,
        #[serde(rename = "receivedMessage")]
        received_message: Value,
        timestamp: String,
    },
    /// Fallback for an object whose `"type"` is absent or unknown. Carries
    /// the raw object so handlers can acknowledge it verbatim.
    #[serde(skip)]
    Unrecognized { raw: Value },
}

impl Envelope {
    /// Decode one raw text frame.
    ///
    /// Malformed JSON, a non-object root, a non-string tag, or a known kind
    /// with unrepresentable fields all fail with [`DecodeError`]. An absent
    /// or unknown tag maps to [`Envelope::Unrecognized`] instead.
    pub fn decode(raw: &str) -> Result<Envelope, DecodeError> {
        let value: Value = serde_json::from_str(raw)?;
        let kind = {
            let Some(object) = value.as_object() else {
                return Err(DecodeError::NotAnObject);
            };
            match object.get("type") {
                None => None,
                Some(Value::String(kind)) => Some(kind.clone()),
                Some(_) => return Err(DecodeError::TagNotAString),
            }
        };

        let Some(kind) = kind else {
            return Ok(Envelope::Unrecognized { raw: value });
        };
        if !is_known_kind(&kind) {
            return Ok(Envelope::Unrecognized { raw: value });
        }
        serde_json::from_value(value).map_err(|source| DecodeError::Fields { kind, source })
    }

    /// Encode to the wire text form. Never fails for well-formed envelopes;
    /// the unrecognized fallback serializes back to its captured object.
    pub fn to_json(&self) -> String {
        match self {
            Envelope::Unrecognized { raw } => raw.to_string(),
            _ => serde_json::to_string(self).expect("envelope serializes to JSON"),
        }
    }

    /// Encode to a JSON value, same contract as [`Envelope::to_json`].
    pub fn to_value(&self) -> Value {
        match self {
            Envelope::Unrecognized { raw } => raw.clone(),
            _ => serde_json::to_value(self).expect("envelope serializes to JSON"),
        }
    }

    /// The wire tag for this envelope, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Ping { .. } => Kinds::PING,
            Envelope::Pong { .. } => Kinds::PONG,
            Envelope::Broadcast { .. } => Kinds::BROADCAST,
            Envelope::Private { .. } => Kinds::PRIVATE,
            Envelope::Echo { .. } => Kinds::ECHO,
            Envelope::Welcome { .. } => Kinds::WELCOME,
            Envelope::UserJoined { .. } => Kinds::USER_JOINED,
            Envelope::UserLeft { .. } => Kinds::USER_LEFT,
            Envelope::Error { .. } => Kinds::ERROR,
            Envelope::PrivateSent { .. } => Kinds::PRIVATE_SENT,
            Envelope::MessageReceived { .. } => Kinds::MESSAGE_RECEIVED,
            Envelope::Unrecognized { .. } => "unrecognized",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructors — client-originated envelopes
// ─────────────────────────────────────────────────────────────────────────────

impl Envelope {
    pub fn ping() -> Self {
        Envelope::Ping {
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn broadcast(message: impl Into<String>) -> Self {
        Envelope::Broadcast {
            from: None,
            message: message.into(),
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn private_to(target_id: impl Into<String>, message: impl Into<String>) -> Self {
        Envelope::Private {
            from: None,
            target_id: Some(target_id.into()),
            message: message.into(),
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn echo(message: impl Into<String>) -> Self {
        Envelope::Echo {
            message: Some(message.into()),
            original_message: None,
            timestamp: Some(timestamp::now()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructors — server-originated envelopes
// ─────────────────────────────────────────────────────────────────────────────

impl Envelope {
    pub fn pong(original_timestamp: Option<String>) -> Self {
        Envelope::Pong {
            timestamp: timestamp::now(),
            original_timestamp,
        }
    }

    pub fn broadcast_from(from: &ConnectionId, message: impl Into<String>) -> Self {
        Envelope::Broadcast {
            from: Some(from.to_string()),
            message: message.into(),
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn private_from(from: &ConnectionId, message: impl Into<String>) -> Self {
        Envelope::Private {
            from: Some(from.to_string()),
            target_id: None,
            message: message.into(),
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn private_sent(target_id: impl Into<String>, message: impl Into<String>) -> Self {
        Envelope::PrivateSent {
            target_id: target_id.into(),
            message: message.into(),
            timestamp: timestamp::now(),
        }
    }

    pub fn echo_reply(original_message: impl Into<String>) -> Self {
        Envelope::Echo {
            message: None,
            original_message: Some(original_message.into()),
            timestamp: Some(timestamp::now()),
        }
    }

    pub fn welcome(connection_id: &ConnectionId) -> Self {
        Envelope::Welcome {
            connection_id: connection_id.to_string(),
            timestamp: timestamp::now(),
            message: WELCOME_MESSAGE.to_string(),
        }
    }

    pub fn user_joined(connection_id: &ConnectionId, total_connections: usize) -> Self {
        Envelope::UserJoined {
            connection_id: connection_id.to_string(),
            timestamp: timestamp::now(),
            total_connections,
        }
    }

    pub fn user_left(connection_id: &ConnectionId, total_connections: usize) -> Self {
        Envelope::UserLeft {
            connection_id: connection_id.to_string(),
            timestamp: timestamp::now(),
            total_connections,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
            timestamp: timestamp::now(),
        }
    }

    pub fn message_received(connection_id: &ConnectionId, received_message: Value) -> Self {
        Envelope::MessageReceived {
            connection_id: connection_id.to_string(),
            received_message,
            timestamp: timestamp::now(),
        }
    }
}
