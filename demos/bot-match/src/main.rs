//! Self-playing duel against the bot, printed round by round.
//!
//! Runs the same rules engine as the networked server with a random
//! caller in both seats, which makes it a quick smoke test of the rules
//! and a demonstration of driving [`BotMatch`] without a server.

use rand::seq::IndexedRandom;

use quinto_engine::{
    BotMatch, Grid, MatchEvent, Outcome, Phase, RandomCaller, Seat,
};

fn main() {
    let mut game = BotMatch::new(RandomCaller);

    println!("quinto: host seat vs. bot, random callers on both sides\n");
    print_grid("host grid", game.player_grid());
    print_grid("bot grid", game.state().grid(Seat::Guest));

    let mut round = 0;
    while !game.is_finished() {
        round += 1;
        for event in play_round(&mut game) {
            describe(round, &event);
        }
    }

    let state = game.state();
    println!();
    println!(
        "final lines: host {}, bot {} ({} numbers called)",
        state.grid(Seat::Host).completed_lines(state.called()),
        state.grid(Seat::Guest).completed_lines(state.called()),
        state.called().len(),
    );
}

/// Plays one full round: whichever seat holds the turn calls a random
/// uncalled number and the other side marks it.
fn play_round(game: &mut BotMatch<RandomCaller>) -> Vec<MatchEvent> {
    if game.is_player_turn() {
        let available: Vec<u8> = (1..=25)
            .filter(|&n| !game.state().called().contains(n))
            .collect();
        let Some(&number) = available.choose(&mut rand::rng()) else {
            return Vec::new();
        };
        game.player_call(number)
    } else {
        let mut events = game.bot_call();
        if let Phase::Marking { number, .. } = game.state().phase() {
            events.extend(game.player_mark(number));
        }
        events
    }
}

fn describe(round: usize, event: &MatchEvent) {
    match event {
        MatchEvent::NumberCalled { number, caller } => {
            println!("round {round:2}: {caller} calls {number}");
        }
        MatchEvent::TurnSwitched { turn } => {
            println!("          {turn} is up next");
        }
        MatchEvent::LifeLost { seat, lives } => {
            println!("          {seat} loses a life ({lives} left)");
        }
        MatchEvent::Finished { outcome } => match outcome {
            Outcome::Winner(seat) => println!("\n{seat} wins the duel"),
            Outcome::Draw => {
                println!("\nboth grids hit five lines: draw")
            }
        },
    }
}

fn print_grid(label: &str, grid: &Grid) {
    println!("{label}:");
    for row in grid.cells().chunks(5) {
        let line: Vec<String> = row.iter().map(|n| format!("{n:2}")).collect();
        println!("  {}", line.join(" "));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_round_always_makes_progress() {
        let mut game = BotMatch::new(RandomCaller);

        // Every round either produces events or the duel is already over;
        // the 25-number pool bounds the loop.
        for _ in 0..25 {
            if game.is_finished() {
                return;
            }
            let events = play_round(&mut game);
            assert!(!events.is_empty(), "a live round produced no events");
        }
        assert!(game.is_finished());
    }
}
