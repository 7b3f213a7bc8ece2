//! Room actor: an isolated Tokio task that owns one bingo duel.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — no shared
//! mutable state, just message passing. The actor loop selects between
//! its command channel and the room's [`Countdown`], so a timer tick can
//! never interleave with a half-processed call, and dropping the actor
//! takes the timer down with it.

use quinto_countdown::Countdown;
use quinto_engine::{Grid, MatchEvent, MatchState, Outcome, Phase, Seat};
use quinto_protocol::{
    PlayerId, Recipient, RoomCode, ServerMessage, TurnPhase, Winner,
};
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError, RoomState};

/// Seats in a duel room. Fixed: quinto is strictly two-player.
const SEATS: usize = 2;

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// Each variant represents an operation the outside world can request.
/// The `oneshot::Sender` in some variants is a "reply channel" — the
/// caller sends a command and waits for the response on that channel.
pub(crate) enum RoomCommand {
    /// Seat the second player.
    Join {
        player: PlayerId,
        username: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<String, RoomError>>,
    },

    /// Host request to begin the duel.
    Start { player: PlayerId },

    /// The player calls a number.
    Call { player: PlayerId, number: u8 },

    /// The player confirms the current number on their grid.
    Mark { player: PlayerId, number: u8 },

    /// A player's connection went away.
    Disconnect { player: PlayerId },

    /// Request the current room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata (not the duel state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's join code.
    pub code: RoomCode,
    /// Current lifecycle state.
    pub state: RoomState,
    /// Number of players currently seated.
    pub players: usize,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// This is cheap to clone — it's just an `mpsc::Sender` wrapper.
/// The `RoomRegistry` holds one of these per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's join code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Seats a player in the guest seat.
    ///
    /// Returns the host's username on success, for the join reply.
    pub async fn join(
        &self,
        player: PlayerId,
        username: String,
        sender: PlayerSender,
    ) -> Result<String, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                username,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Asks the room to start its duel (fire-and-forget).
    pub async fn start(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Start { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Delivers a number call from a player (fire-and-forget).
    pub async fn call(
        &self,
        player: PlayerId,
        number: u8,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Call { player, number })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Delivers a mark confirmation from a player (fire-and-forget).
    pub async fn mark(
        &self,
        player: PlayerId,
        number: u8,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Mark { player, number })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Reports a player's connection as gone.
    pub async fn disconnect(
        &self,
        player: PlayerId,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// One seated player: identity, private grid, outbound channel.
struct SeatEntry {
    player: PlayerId,
    username: String,
    grid: Grid,
    sender: PlayerSender,
}

/// The internal room actor state. Runs inside a Tokio task.
///
/// `seats[0]` is always the host; join order is turn order, which the
/// engine's timeout penalties rely on.
struct RoomActor {
    code: RoomCode,
    state: RoomState,
    config: RoomConfig,
    seats: Vec<SeatEntry>,
    game: Option<MatchState>,
    countdown: Countdown,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Announces this room's code when the actor exits, so the registry
    /// can drop its handle.
    done: mpsc::UnboundedSender<RoomCode>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands and countdown ticks
    /// until the room closes or every handle is dropped.
    async fn run(mut self) {
        tracing::info!(
            room = %self.code,
            host = %self.seats[0].username,
            "room actor started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    self.handle_command(cmd);
                }
                tick = self.countdown.tick() => {
                    self.broadcast_timer(tick.remaining);
                    if tick.expired {
                        self.handle_expiry();
                    }
                }
            }

            if self.state == RoomState::Closed {
                break;
            }
        }

        self.countdown.cancel();
        let _ = self.done.send(self.code.clone());
        tracing::info!(room = %self.code, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                player,
                username,
                sender,
                reply,
            } => {
                let result = self.handle_join(player, username, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Start { player } => self.handle_start(player),
            RoomCommand::Call { player, number } => {
                self.handle_call(player, number);
            }
            RoomCommand::Mark { player, number } => {
                self.handle_mark(player, number);
            }
            RoomCommand::Disconnect { player } => {
                self.handle_disconnect(player);
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
        }
    }

    /// Seats the guest. Checked in precedence order: a started room
    /// reports "already started" even though it is also full.
    fn handle_join(
        &mut self,
        player: PlayerId,
        username: String,
        sender: PlayerSender,
    ) -> Result<String, RoomError> {
        if !self.state.is_joinable() {
            return Err(RoomError::AlreadyStarted(self.code.clone()));
        }
        if self.seats.len() >= SEATS {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        let host_name = self.seats[0].username.clone();
        self.send_to(
            Recipient::AllExcept(player),
            ServerMessage::PlayerJoined {
                username: username.clone(),
            },
        );

        let grid = Grid::shuffled(&mut rand::rng());
        self.seats.push(SeatEntry {
            player,
            username,
            grid,
            sender,
        });
        tracing::info!(
            room = %self.code,
            %player,
            players = self.seats.len(),
            "player joined"
        );

        Ok(host_name)
    }

    /// Starts the duel: host only, both seats filled, still in lobby.
    /// Anything else is silently dropped, like every other bad request
    /// from a seated player.
    fn handle_start(&mut self, player: PlayerId) {
        if self.state != RoomState::Lobby
            || self.seats.len() < SEATS
            || self.seats[0].player != player
        {
            tracing::debug!(
                room = %self.code,
                %player,
                "ignoring invalid start request"
            );
            return;
        }

        let game = MatchState::with_lives(
            self.seats[0].grid.clone(),
            self.seats[1].grid.clone(),
            self.config.starting_lives,
        );
        self.state = RoomState::InGame;

        // Each player sees only their own grid.
        for seat in Seat::BOTH {
            let entry = &self.seats[seat.index()];
            let opponent = &self.seats[seat.opponent().index()];
            self.send_to(
                Recipient::Player(entry.player),
                ServerMessage::GameStart {
                    grid: entry.grid.cells().to_vec(),
                    opponent: opponent.username.clone(),
                    is_turn: game.turn() == seat,
                },
            );
        }

        self.game = Some(game);
        self.restart_countdown();
        tracing::info!(room = %self.code, "duel started");
    }

    fn handle_call(&mut self, player: PlayerId, number: u8) {
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let events = game.call(seat, number);
        if events.is_empty() {
            tracing::debug!(room = %self.code, %player, number, "call rejected");
            return;
        }
        self.apply_events(events);
    }

    fn handle_mark(&mut self, player: PlayerId, number: u8) {
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };
        // With two seats the caller is pre-acked, so a valid mark always
        // resolves the round; no events means the mark was rejected.
        let events = game.mark(seat, number);
        if events.is_empty() {
            tracing::debug!(room = %self.code, %player, number, "mark rejected");
            return;
        }
        self.apply_events(events);
    }

    /// Spends a life on whoever stalled the round and moves on. The
    /// pre-penalty zero was already broadcast by the actor loop.
    fn handle_expiry(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        tracing::debug!(room = %self.code, "turn countdown expired");
        let events = game.expire_countdown();
        self.apply_events(events);
    }

    fn handle_disconnect(&mut self, player: PlayerId) {
        if self.seat_of(player).is_none() {
            return;
        }
        tracing::info!(
            room = %self.code,
            %player,
            "player disconnected, closing room"
        );
        self.send_to(
            Recipient::AllExcept(player),
            ServerMessage::PlayerDisconnected,
        );
        self.close();
    }

    /// Translates engine events into wire messages and room lifecycle.
    fn apply_events(&mut self, events: Vec<MatchEvent>) {
        for event in events {
            match event {
                MatchEvent::NumberCalled { number, caller } => {
                    let caller = self.player_at(caller);
                    self.send_to(
                        Recipient::All,
                        ServerMessage::NumberCalled { number, caller },
                    );
                    self.restart_countdown();
                }
                MatchEvent::TurnSwitched { turn } => {
                    let turn_id = self.player_at(turn);
                    self.send_to(
                        Recipient::All,
                        ServerMessage::TurnSwitch { turn_id },
                    );
                    self.restart_countdown();
                }
                MatchEvent::LifeLost { seat, lives } => {
                    let player_id = self.player_at(seat);
                    self.send_to(
                        Recipient::All,
                        ServerMessage::HealthUpdate { player_id, lives },
                    );
                }
                MatchEvent::Finished { outcome } => {
                    tracing::info!(
                        room = %self.code,
                        ?outcome,
                        "duel finished"
                    );
                    let winner = match outcome {
                        Outcome::Winner(seat) => Winner::Name(
                            self.seats[seat.index()].username.clone(),
                        ),
                        Outcome::Draw => Winner::Draw,
                    };
                    self.send_to(
                        Recipient::All,
                        ServerMessage::GameOver { winner },
                    );
                    self.close();
                }
            }
        }
    }

    /// Rearms the countdown and announces the fresh allowance, as every
    /// phase transition does.
    fn restart_countdown(&mut self) {
        self.countdown.restart();
        self.broadcast_timer(self.countdown.remaining());
    }

    fn broadcast_timer(&self, time_left: u32) {
        self.send_to(
            Recipient::All,
            ServerMessage::TimerUpdate {
                time_left,
                phase: self.wire_phase(),
            },
        );
    }

    /// Ends the room. The actor loop exits on the next pass and the
    /// registry learns through the completion channel.
    fn close(&mut self) {
        self.state = RoomState::Closed;
        self.countdown.cancel();
    }

    fn wire_phase(&self) -> TurnPhase {
        match self.game.as_ref().map(MatchState::phase) {
            Some(Phase::Marking { .. }) => TurnPhase::Marking,
            _ => TurnPhase::Calling,
        }
    }

    fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.seats
            .iter()
            .position(|entry| entry.player == player)
            .map(|index| Seat::BOTH[index])
    }

    fn player_at(&self, seat: Seat) -> PlayerId {
        self.seats[seat.index()].player
    }

    /// Dispatches a message to the players matching `recipient`.
    /// Silently drops sends to players whose receiver is gone.
    fn send_to(&self, recipient: Recipient, msg: ServerMessage) {
        match recipient {
            Recipient::All => {
                for entry in &self.seats {
                    let _ = entry.sender.send(msg.clone());
                }
            }
            Recipient::Player(player) => {
                if let Some(entry) =
                    self.seats.iter().find(|e| e.player == player)
                {
                    let _ = entry.sender.send(msg);
                }
            }
            Recipient::AllExcept(excluded) => {
                for entry in &self.seats {
                    if entry.player != excluded {
                        let _ = entry.sender.send(msg.clone());
                    }
                }
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            state: self.state,
            players: self.seats.len(),
        }
    }
}

/// Spawns a new room actor task with `host` already seated and returns
/// a handle to communicate with it.
///
/// `channel_size` controls backpressure — if the channel fills up,
/// senders will wait (bounded channel).
pub(crate) fn spawn_room(
    code: RoomCode,
    config: RoomConfig,
    host: PlayerId,
    host_username: String,
    host_sender: PlayerSender,
    done: mpsc::UnboundedSender<RoomCode>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let countdown = Countdown::new(config.countdown_secs);
    let host_grid = Grid::shuffled(&mut rand::rng());
    let actor = RoomActor {
        code: code.clone(),
        state: RoomState::Lobby,
        config,
        seats: vec![SeatEntry {
            player: host,
            username: host_username,
            grid: host_grid,
            sender: host_sender,
        }],
        game: None,
        countdown,
        receiver: rx,
        done,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
