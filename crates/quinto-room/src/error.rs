//! Error types for the room layer.

use quinto_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
///
/// The `Display` strings double as the `error.message` payload sent to
/// clients when a create or join request is rejected.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists under the given join code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// Both seats of the room are taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The duel in this room has already started.
    #[error("game in room {0} already started")]
    AlreadyStarted(RoomCode),

    /// The player already occupies a seat in some room.
    #[error("player {0} is already in a room")]
    AlreadyInRoom(PlayerId),

    /// The player does not occupy a seat in any room.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// The room's command channel is closed; the actor has exited.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
