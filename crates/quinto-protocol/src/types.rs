//! Core protocol types for Quinto's wire format.
//!
//! Everything a client and server say to each other during a bingo duel is
//! defined here: the identity types, the client-to-server commands, and the
//! server-to-client events. The JSON shapes are a contract — browser clients
//! parse these by their `type` tag and camelCase field names, so every serde
//! attribute in this file is load-bearing.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a player id can't be confused with any other
/// number in a signature. The server derives it from the connection id:
/// a player exists exactly as long as their socket does.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`,
/// not `{"0":42}` — clients expect a bare number in `caller`, `turnId`
/// and `playerId` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room's join code: six uppercase alphanumeric characters.
///
/// This is what one player reads out loud to the other, so it is kept
/// short and case-insensitive. The constructor uppercases its input and
/// `Deserialize` goes through the constructor, which means a client can
/// type `"ab12cd"` into a join form and still land in `AB12CD`.
///
/// Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

/// Length of generated join codes.
pub const ROOM_CODE_LEN: usize = 6;

impl RoomCode {
    /// Builds a code from arbitrary input, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Hand-written so that codes arriving on the wire are normalized the same
// way as codes built in process. A derive would skip `RoomCode::new`.
impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RoomCode::new(raw))
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server message.
///
/// The room actor produces `(Recipient, ServerMessage)` pairs; this enum
/// tells the dispatch step where each one goes. It never travels on the
/// wire itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,

    /// One specific player.
    Player(PlayerId),

    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Game vocabulary helpers
// ---------------------------------------------------------------------------

/// Which half of a turn the room is in, as shown to clients.
///
/// `timerUpdate` carries this so the client can label the countdown
/// ("your call" vs "mark the number"). Lowercase on the wire:
/// `"calling"` / `"marking"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Calling,
    Marking,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPhase::Calling => f.write_str("calling"),
            TurnPhase::Marking => f.write_str("marking"),
        }
    }
}

/// The result carried by `gameOver`.
///
/// On the wire this is a single string: the winner's username, or the
/// literal `"draw"` when both players complete five lines on the same
/// number. The string form is the contract; a player who names themselves
/// "draw" is indistinguishable from a draw, which clients accept as a
/// quirk of the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Name(String),
    Draw,
}

impl Serialize for Winner {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Winner::Name(name) => serializer.serialize_str(name),
            Winner::Draw => serializer.serialize_str("draw"),
        }
    }
}

impl<'de> Deserialize<'de> for Winner {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "draw" {
            Winner::Draw
        } else {
            Winner::Name(raw)
        })
    }
}

// ---------------------------------------------------------------------------
// ClientMessage — everything a client may send
// ---------------------------------------------------------------------------

/// Commands a client sends to the server.
///
/// `#[serde(tag = "type", rename_all = "camelCase")]` produces internally
/// tagged JSON with the historical event names:
///   `{ "type": "createRoom", "username": "ada" }`
/// Variants carrying a room id rename that field to `roomId` so the shape
/// matches what web clients already emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Open a new room and take the host seat.
    CreateRoom { username: String },

    /// Join an existing room by its code.
    #[serde(rename_all = "camelCase")]
    JoinRoom { username: String, room_id: RoomCode },

    /// Host only: begin the match once two players are seated.
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: RoomCode },

    /// Call a number; valid only on the sender's turn in the calling phase.
    CallNumber { number: u8 },

    /// Confirm the currently called number on the sender's own grid.
    MarkNumber { number: u8 },
}

// ---------------------------------------------------------------------------
// ServerMessage — everything the server may send
// ---------------------------------------------------------------------------

/// Events the server sends to clients.
///
/// Same tagging scheme as [`ClientMessage`]. Which players receive each
/// variant is decided by the room actor via [`Recipient`]; the shapes here
/// are identical for every recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// To the creator: the room exists and they are its host.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: RoomCode, username: String },

    /// To the joiner: they are seated; `host` is the host's username.
    #[serde(rename_all = "camelCase")]
    JoinedRoom {
        room_id: RoomCode,
        host: String,
        username: String,
    },

    /// To the host: a second player took the guest seat.
    PlayerJoined { username: String },

    /// To each player privately: their own 25-cell grid (row-major),
    /// the opponent's username, and whether they move first.
    #[serde(rename_all = "camelCase")]
    GameStart {
        grid: Vec<u8>,
        opponent: String,
        is_turn: bool,
    },

    /// Broadcast: a number is on the table, marking phase begins.
    NumberCalled { number: u8, caller: PlayerId },

    /// Broadcast: the turn moved to `turnId`, back to the calling phase.
    #[serde(rename_all = "camelCase")]
    TurnSwitch { turn_id: PlayerId },

    /// Broadcast once per second while the countdown runs, plus once
    /// with the full value whenever it restarts.
    #[serde(rename_all = "camelCase")]
    TimerUpdate { time_left: u32, phase: TurnPhase },

    /// Broadcast: a player lost a life to countdown expiry.
    #[serde(rename_all = "camelCase")]
    HealthUpdate { player_id: PlayerId, lives: u8 },

    /// Broadcast: the match is over; the room is gone after this.
    GameOver { winner: Winner },

    /// To the remaining peer: the other player's socket closed.
    PlayerDisconnected,

    /// To one requester: a room operation failed.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
