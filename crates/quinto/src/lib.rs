//! # Quinto
//!
//! Authoritative server for two-player live bingo duels.
//!
//! Players connect over WebSocket, open a room, and share its six
//! character code with an opponent. Each player gets a shuffled 5×5
//! grid of the numbers 1–25; turns alternate between calling a number
//! and the opponent marking it, under a per-turn countdown that costs
//! a life when it runs out. The first grid with five completed lines
//! wins the duel.
//!
//! The server owns all game state. Clients only ever send intents
//! (create, join, start, call, mark) and render what the server
//! broadcasts back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quinto::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let server = QuintoServer::<JsonCodec>::builder()
//!         .bind("0.0.0.0:3000")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{QuintoServer, QuintoServerBuilder};

/// Convenience re-exports for server embedders.
pub mod prelude {
    pub use crate::{QuintoServer, QuintoServerBuilder, ServerError};
    pub use quinto_protocol::{
        ClientMessage, Codec, JsonCodec, PlayerId, RoomCode, ServerMessage,
        TurnPhase, Winner,
    };
    pub use quinto_room::{RoomConfig, RoomError, RoomState};
}
