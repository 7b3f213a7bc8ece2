//! Local player-versus-bot simulation.
//!
//! [`BotMatch`] mirrors what the server does for a networked duel, with a
//! bot in the guest seat. It drives the exact [`MatchState`] the room
//! actor uses, so phase transitions, win judgment, and timeout penalties
//! cannot drift from the authoritative rules. The only additions are bot
//! behavior: choosing calls through a [`CallStrategy`] and acking the
//! human's calls immediately.

use rand::seq::IndexedRandom;

use crate::grid::{Grid, CELL_COUNT};
use crate::match_state::{MatchEvent, MatchState, Phase, Seat};
use crate::strategy::CallStrategy;

/// A duel between the local player (host seat, first to move) and a bot.
pub struct BotMatch<S> {
    state: MatchState,
    strategy: S,
}

impl<S: CallStrategy> BotMatch<S> {
    /// Starts a local duel with freshly shuffled grids for both sides.
    pub fn new(strategy: S) -> Self {
        let mut rng = rand::rng();
        Self::with_grids(
            Grid::shuffled(&mut rng),
            Grid::shuffled(&mut rng),
            strategy,
        )
    }

    /// Starts a local duel from explicit grids.
    pub fn with_grids(player_grid: Grid, bot_grid: Grid, strategy: S) -> Self {
        Self {
            state: MatchState::new(player_grid, bot_grid),
            strategy,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn player_grid(&self) -> &Grid {
        self.state.grid(Seat::Host)
    }

    pub fn is_player_turn(&self) -> bool {
        self.state.turn() == Seat::Host
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// The player calls a number. The bot acks it immediately, so a valid
    /// call resolves the whole round in one step.
    pub fn player_call(&mut self, number: u8) -> Vec<MatchEvent> {
        let mut events = self.state.call(Seat::Host, number);
        if events.is_empty() {
            return events;
        }
        events.extend(self.state.mark(Seat::Guest, number));
        events
    }

    /// The player confirms the number the bot called.
    pub fn player_mark(&mut self, number: u8) -> Vec<MatchEvent> {
        self.state.mark(Seat::Host, number)
    }

    /// The bot takes its calling turn, consulting the strategy.
    ///
    /// Does nothing unless it is the bot's turn in the calling phase.
    /// After this the player still has to [`player_mark`] the number.
    ///
    /// [`player_mark`]: Self::player_mark
    pub fn bot_call(&mut self) -> Vec<MatchEvent> {
        if self.state.is_finished()
            || self.state.turn() != Seat::Guest
            || self.state.phase() != Phase::Calling
        {
            return Vec::new();
        }

        let available: Vec<u8> = (1..=CELL_COUNT as u8)
            .filter(|&n| !self.state.called().contains(n))
            .collect();
        if available.is_empty() {
            return Vec::new();
        }

        let choice = match self.strategy.choose(
            &available,
            self.state.called(),
            self.state.grid(Seat::Guest),
        ) {
            Some(n) if available.contains(&n) => n,
            // Bad or missing choice: fall back to random so the game
            // keeps moving.
            _ => *available
                .choose(&mut rand::rng())
                .unwrap_or(&available[0]),
        };

        self.state.call(Seat::Guest, choice)
    }

    /// The turn countdown ran out; same penalties as the server applies.
    pub fn expire_countdown(&mut self) -> Vec<MatchEvent> {
        self.state.expire_countdown()
    }
}
