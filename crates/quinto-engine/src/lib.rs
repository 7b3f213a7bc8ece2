//! Game rules for Quinto: grids, win checking, and the duel state machine.
//!
//! This crate is the single home of the rules. The networked server and
//! the local player-versus-bot simulation both drive [`MatchState`], so a
//! number judged a winner in one place is a winner in the other.
//!
//! - [`Grid`] / [`NumberSet`] — 5x5 grids and the called-number set the
//!   line predicate runs against.
//! - [`MatchState`] — turn ownership, calling/marking phases, lives, and
//!   win/draw resolution, reported as [`MatchEvent`]s.
//! - [`BotMatch`] + [`CallStrategy`] — the local simulation and the seam
//!   for plugging in smarter (or external) bot callers.
//!
//! Everything here is synchronous and deterministic given an RNG; timing
//! and delivery live in the room layer.

mod error;
mod grid;
mod local;
mod match_state;
mod strategy;

pub use error::EngineError;
pub use grid::{Grid, NumberSet, CELL_COUNT, LINES_TO_WIN, SIDE};
pub use local::BotMatch;
pub use match_state::{
    MatchEvent, MatchState, Outcome, Phase, Seat, STARTING_LIVES,
};
pub use strategy::{CallStrategy, RandomCaller};
