//! Pluggable number-choice strategies for the bot opponent.
//!
//! The local simulation asks a [`CallStrategy`] which number the bot
//! should call. Anything that can rank numbers fits behind this trait,
//! including strategies that consult an external model; the engine itself
//! never performs that kind of call. A strategy that errors out or picks
//! an unplayable number is overridden by a random choice, so a flaky
//! implementation degrades to the default instead of stalling the game.

use rand::seq::IndexedRandom;

use crate::grid::{Grid, NumberSet};

/// Chooses the bot's next call.
pub trait CallStrategy {
    /// Picks a number for the bot to call.
    ///
    /// `available` holds every still-callable number (uncalled, in
    /// 1..=25) and is never empty. `called` and `own_grid` give the
    /// strategy enough context to aim for the bot's own lines. Returning
    /// `None` or a number outside `available` defers to a random pick.
    fn choose(
        &mut self,
        available: &[u8],
        called: &NumberSet,
        own_grid: &Grid,
    ) -> Option<u8>;
}

/// The default strategy: uniform random over the available numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCaller;

impl CallStrategy for RandomCaller {
    fn choose(
        &mut self,
        available: &[u8],
        _called: &NumberSet,
        _own_grid: &Grid,
    ) -> Option<u8> {
        available.choose(&mut rand::rng()).copied()
    }
}
