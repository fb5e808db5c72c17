//! Codec error types.

use thiserror::Error;

/// Failure to decode a raw text frame into an [`Envelope`](crate::Envelope).
///
/// Callers recover by reporting back to the originating connection; a decode
/// failure is never allowed to tear down a session.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("envelope must be a JSON object")]
    NotAnObject,

    #[error("envelope `type` must be a string")]
    TagNotAString,

    #[error("unrepresentable `{kind}` envelope: {source}")]
    Fields {
        kind: String,
        source: serde_json::Error,
    },
}
