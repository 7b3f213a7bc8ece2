//! Unified error type for the quinto server.

use quinto_protocol::ProtocolError;
use quinto_room::RoomError;
use quinto_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Server code deals with this single error type instead of importing
/// errors from each sub-crate. The `#[from]` attribute on each variant
/// auto-generates `From` impls, so the `?` operator converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, not found, invalid state).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The health listener could not be set up.
    #[error("health endpoint error: {0}")]
    Health(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use quinto_protocol::{ClientMessage, Codec, JsonCodec, RoomCode};

    #[test]
    fn test_from_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let server_err: ServerError = TransportError::SendFailed(io).into();
        assert!(matches!(server_err, ServerError::Transport(_)));
        assert!(server_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec
            .decode::<ClientMessage>(b"not json")
            .expect_err("garbage should not decode");
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomCode::new("AAAAAA"));
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Room(_)));
        assert!(server_err.to_string().contains("AAAAAA"));
    }
}
