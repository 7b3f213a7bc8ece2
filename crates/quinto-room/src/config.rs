//! Room configuration and lifecycle state.

use serde::{Deserialize, Serialize};

use quinto_engine::STARTING_LIVES;
use quinto_protocol::ROOM_CODE_LEN;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Tunables for a room instance.
///
/// The seat count is not configurable: a Quinto room always holds exactly
/// two players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Seconds each calling/marking phase may last before a life is lost.
    pub countdown_secs: u32,

    /// Lives each player starts the duel with.
    pub starting_lives: u8,

    /// Length of generated join codes.
    pub code_len: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 30,
            starting_lives: STARTING_LIVES,
            code_len: ROOM_CODE_LEN,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered:
///
/// ```text
/// Lobby → InGame → Closed
/// ```
///
/// - **Lobby**: Room exists, accepting joins. The duel has not started.
/// - **InGame**: The duel is running. Players call and mark numbers,
///   the phase countdown is armed.
/// - **Closed**: The duel ended or a player left. The room actor exits
///   and the room is removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Lobby,
    InGame,
    Closed,
}

impl RoomState {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if the room is actively running a duel.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InGame)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InGame => write!(f, "InGame"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}
