//! Room lifecycle management for Quinto.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its two
//! seats, the duel's state machine, and the per-phase countdown. The
//! registry creates rooms under six-character join codes, indexes which
//! player sits where, and tears rooms down on game over or disconnect.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/removes rooms, routes players
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomState`] — lifecycle state machine
//! - [`RoomConfig`] — room settings (countdown seconds, starting lives)

mod config;
mod error;
mod manager;
mod room;

pub use config::{RoomConfig, RoomState};
pub use error::RoomError;
pub use manager::RoomRegistry;
pub use room::{PlayerSender, RoomHandle, RoomInfo};
