//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A codec converts between Rust types and raw frame bytes. The rest of the
//! server only talks to the [`Codec`] trait, so the wire format can change
//! without touching the handler or the rooms. [`JsonCodec`] is the default:
//! browser clients speak JSON text frames natively and messages stay
//! readable in DevTools.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance lives in the shared
/// server state and is used from every connection task. The methods are
/// generic over the message type: the same codec handles [`ClientMessage`]
/// and [`ServerMessage`] without caring which is which.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value owns
/// its data and the incoming frame buffer can be dropped immediately.
///
/// [`ClientMessage`]: crate::ClientMessage
/// [`ServerMessage`]: crate::ServerMessage
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes frame bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// truncated, or don't match the expected message shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default) so embedders that
/// bring their own format don't pull in `serde_json`.
///
/// ## Example
///
/// ```rust
/// use quinto_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
///
/// let msg = ClientMessage::CallNumber { number: 17 };
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: ClientMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
