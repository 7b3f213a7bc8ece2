//! The authoritative turn/phase state machine for one bingo duel.
//!
//! [`MatchState`] is pure game logic: no clocks, no sockets, no player
//! ids. It speaks in [`Seat`]s and reports what happened as
//! [`MatchEvent`]s, which the room actor translates to wire messages and
//! the local simulation consumes directly. Keeping both paths on this one
//! type is what guarantees they can never disagree about the rules.
//!
//! Invalid operations (wrong turn, wrong phase, repeat numbers, anything
//! after the match finished) return no events and change nothing. Callers
//! that care can log; the state machine stays silent.

use crate::grid::{Grid, NumberSet};

/// Lives each player starts with. Only countdown expiry spends them.
pub const STARTING_LIVES: u8 = 3;

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// One of the two positions in a duel. The host seats first and moves
/// first; seat order is join order, which timeout penalties rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    Host,
    Guest,
}

impl Seat {
    /// Both seats in join order.
    pub const BOTH: [Seat; 2] = [Seat::Host, Seat::Guest];

    pub fn opponent(self) -> Seat {
        match self {
            Seat::Host => Seat::Guest,
            Seat::Guest => Seat::Host,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::Host => 0,
            Seat::Guest => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::Host => f.write_str("host"),
            Seat::Guest => f.write_str("guest"),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Which half of a turn the duel is in.
///
/// A tagged union instead of flag fields: a called number exists only
/// while marking, and the ack set exists only alongside it, so states
/// like "calling, but with a leftover current number" cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The turn holder must call a number.
    Calling,
    /// `number` is on the table; `acked` records per seat index who has
    /// confirmed the mark. The caller is acked from the start.
    Marking { number: u8, acked: [bool; 2] },
}

// ---------------------------------------------------------------------------
// Events and outcome
// ---------------------------------------------------------------------------

/// How a finished duel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Seat),
    /// Both grids crossed the line threshold on the same resolution.
    Draw,
}

/// What a state transition produced, in order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// A number was called; marking begins.
    NumberCalled { number: u8, caller: Seat },
    /// The round resolved without a winner; `turn` now calls.
    TurnSwitched { turn: Seat },
    /// A seat was penalized by countdown expiry.
    LifeLost { seat: Seat, lives: u8 },
    /// The duel is over. Always the final event of a match.
    Finished { outcome: Outcome },
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SeatState {
    grid: Grid,
    lives: u8,
}

/// Full state of one running duel.
#[derive(Debug)]
pub struct MatchState {
    seats: [SeatState; 2],
    called: NumberSet,
    turn: Seat,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl MatchState {
    /// Starts a duel with the standard life allowance. The host holds
    /// the turn and the phase is [`Phase::Calling`].
    pub fn new(host_grid: Grid, guest_grid: Grid) -> Self {
        Self::with_lives(host_grid, guest_grid, STARTING_LIVES)
    }

    /// Starts a duel with a custom life allowance (clamped to at least 1).
    pub fn with_lives(host_grid: Grid, guest_grid: Grid, lives: u8) -> Self {
        let lives = lives.max(1);
        Self {
            seats: [
                SeatState {
                    grid: host_grid,
                    lives,
                },
                SeatState {
                    grid: guest_grid,
                    lives,
                },
            ],
            called: NumberSet::new(),
            turn: Seat::Host,
            phase: Phase::Calling,
            outcome: None,
        }
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn called(&self) -> &NumberSet {
        &self.called
    }

    pub fn grid(&self, seat: Seat) -> &Grid {
        &self.seats[seat.index()].grid
    }

    pub fn lives(&self, seat: Seat) -> u8 {
        self.seats[seat.index()].lives
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// The turn holder calls `number`.
    ///
    /// Valid only in [`Phase::Calling`], from the seat holding the turn,
    /// with a number in 1..=25 that has not been called. On success the
    /// number joins the called set and marking begins with the caller
    /// already acked.
    pub fn call(&mut self, seat: Seat, number: u8) -> Vec<MatchEvent> {
        if self.outcome.is_some()
            || self.phase != Phase::Calling
            || seat != self.turn
        {
            return Vec::new();
        }
        if !self.called.insert(number) {
            // Repeat or out of range.
            return Vec::new();
        }

        let mut acked = [false; 2];
        acked[seat.index()] = true;
        self.phase = Phase::Marking { number, acked };

        vec![MatchEvent::NumberCalled {
            number,
            caller: seat,
        }]
    }

    /// A seat confirms the currently called number on its own grid.
    ///
    /// Valid only in [`Phase::Marking`] for exactly the number on the
    /// table, once per seat. When the last seat acks, the round resolves:
    /// either somebody has bingo or the turn flips.
    pub fn mark(&mut self, seat: Seat, number: u8) -> Vec<MatchEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let Phase::Marking {
            number: current,
            acked,
        } = &mut self.phase
        else {
            return Vec::new();
        };
        if number != *current || acked[seat.index()] {
            return Vec::new();
        }
        acked[seat.index()] = true;
        if !acked.iter().all(|&a| a) {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.resolve_round(&mut events);
        events
    }

    /// The turn countdown ran out.
    ///
    /// The offender is the seat the duel is waiting on: the turn holder in
    /// [`Phase::Calling`], otherwise the first seat in join order that has
    /// not acked. They lose a life; at zero the opponent wins on the spot.
    /// Otherwise the round resolves exactly as if marking had completed,
    /// so a bingo already on the table still counts.
    pub fn expire_countdown(&mut self) -> Vec<MatchEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let offender = match &self.phase {
            Phase::Calling => Some(self.turn),
            Phase::Marking { acked, .. } => {
                Seat::BOTH.into_iter().find(|s| !acked[s.index()])
            }
        };

        let mut events = Vec::new();
        if let Some(seat) = offender {
            let slot = &mut self.seats[seat.index()];
            slot.lives = slot.lives.saturating_sub(1);
            let lives = slot.lives;
            events.push(MatchEvent::LifeLost { seat, lives });

            if lives == 0 {
                self.finish(Outcome::Winner(seat.opponent()), &mut events);
                return events;
            }
        }
        self.resolve_round(&mut events);
        events
    }

    /// Win evaluation followed by the turn flip. Shared by mark completion
    /// and countdown expiry so both judge from the same called set.
    fn resolve_round(&mut self, events: &mut Vec<MatchEvent>) {
        let host = self.seats[Seat::Host.index()]
            .grid
            .has_bingo(&self.called);
        let guest = self.seats[Seat::Guest.index()]
            .grid
            .has_bingo(&self.called);

        match (host, guest) {
            (true, true) => self.finish(Outcome::Draw, events),
            (true, false) => {
                self.finish(Outcome::Winner(Seat::Host), events)
            }
            (false, true) => {
                self.finish(Outcome::Winner(Seat::Guest), events)
            }
            (false, false) => {
                self.turn = self.turn.opponent();
                self.phase = Phase::Calling;
                events.push(MatchEvent::TurnSwitched { turn: self.turn });
            }
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<MatchEvent>) {
        self.outcome = Some(outcome);
        events.push(MatchEvent::Finished { outcome });
    }
}

// =========================================================================
// Tests
// =========================================================================
