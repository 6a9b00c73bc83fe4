//! Frame codec.
//!
//! The real-time transport hands the room raw frames; a [`Codec`] turns
//! them into [`InboundMessage`](crate::InboundMessage)s. Outbound
//! messages leave the room as typed values and the transport frames them
//! itself. JSON is the only format the transport boundary uses today.

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// Decodes inbound frames.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or
    /// don't match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use arena_protocol::{Codec, InboundMessage, JsonCodec};
///
/// let msg: InboundMessage = JsonCodec
///     .decode(br#"{"type": "move", "payload": {"x": 1}}"#)
///     .unwrap();
/// assert_eq!(msg.kind, "move");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
