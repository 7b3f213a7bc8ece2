//! Per-turn countdown timer for Quinto room actors.
//!
//! A duel gives each turn a fixed number of seconds; clients watch the
//! remaining value tick down and the room penalizes whoever let it reach
//! zero. This crate provides that timer as a value the room actor owns
//! and polls, so there is no separate timer task to cancel and no way for
//! an expiry to fire after its room is gone — dropping the actor drops
//! the countdown.
//!
//! # Integration
//!
//! [`Countdown::tick`] is written for the actor's `tokio::select!` loop.
//! While disarmed it pends forever, which keeps the loop shape uniform:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* may call restart()/cancel() */ }
//!         tick = countdown.tick() => {
//!             broadcast_time_left(tick.remaining);
//!             if tick.expired { /* penalize, then restart() */ }
//!         }
//!     }
//! }
//! ```
//!
//! One tick elapses per second of the countdown. The cadence is anchored
//! to the deadline of the previous tick rather than to wake-up time, so a
//! slow loop iteration does not stretch the turn.

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace};

/// One elapsed second of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// Seconds left after this tick. The final tick reports 0.
    pub remaining: u32,
    /// `true` exactly once per arm, on the tick that reaches 0. The
    /// countdown disarms itself at that point.
    pub expired: bool,
}

/// A restartable turn countdown.
///
/// Starts disarmed; nothing happens until [`restart`](Self::restart).
/// Each restart rewinds to the full value, which is how every turn
/// transition grants the next player their whole allowance.
pub struct Countdown {
    tick: Duration,
    total: u32,
    remaining: u32,
    next_tick: Option<TokioInstant>,
}

impl Countdown {
    /// A countdown of `total` seconds (at least 1), ticking once per
    /// second.
    pub fn new(total: u32) -> Self {
        Self::with_tick(total, Duration::from_secs(1))
    }

    /// A countdown of `total` ticks of length `tick`. The game uses
    /// one-second ticks; shorter ones exist for embedders that want a
    /// faster pace.
    pub fn with_tick(total: u32, tick: Duration) -> Self {
        Self {
            tick,
            total: total.max(1),
            remaining: 0,
            next_tick: None,
        }
    }

    /// Rewinds to the full value and arms the timer. The first tick lands
    /// one tick-length from now.
    pub fn restart(&mut self) {
        self.remaining = self.total;
        self.next_tick = Some(TokioInstant::now() + self.tick);
        debug!(total = self.total, "countdown restarted");
    }

    /// Disarms the timer. [`tick`](Self::tick) pends until the next
    /// restart. Idempotent.
    pub fn cancel(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(remaining = self.remaining, "countdown cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Seconds left; equals the full value right after a restart and 0
    /// once expired or never started.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The full per-turn allowance.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Waits for the next second to elapse.
    ///
    /// Pends forever while disarmed — `tokio::select!` keeps servicing
    /// other branches. On the tick that reaches 0 the countdown disarms
    /// and reports `expired`.
    pub async fn tick(&mut self) -> CountdownTick {
        let Some(next) = self.next_tick else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(next).await;

        self.remaining = self.remaining.saturating_sub(1);
        let expired = self.remaining == 0;
        // Anchor the next deadline to this one, not to now, so cadence
        // never drifts. Expiry disarms until the next restart.
        self.next_tick = (!expired).then(|| next + self.tick);

        trace!(remaining = self.remaining, expired, "countdown tick");

        CountdownTick {
            remaining: self.remaining,
            expired,
        }
    }
}
