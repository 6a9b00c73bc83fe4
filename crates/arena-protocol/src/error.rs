//! Error types for the protocol layer.

/// A frame that could not be turned into a protocol value.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Malformed JSON, missing fields, wrong types or a truncated frame.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
