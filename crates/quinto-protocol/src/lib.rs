//! Wire protocol for Quinto.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`PlayerId`],
//!   [`RoomCode`], etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from frame bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the rooms
//! (game state). It knows nothing about connections, grids, or turns —
//! only about shapes on the wire.
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Rooms (game state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, PlayerId, Recipient, RoomCode, ServerMessage, TurnPhase,
    Winner, ROOM_CODE_LEN,
};
