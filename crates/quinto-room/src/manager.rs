//! Room registry: creates, tracks, and routes players to rooms.

use std::collections::HashMap;

use quinto_protocol::{PlayerId, RoomCode};
use rand::Rng;
use tokio::sync::mpsc;

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Join codes draw from uppercase letters and digits.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Owns all live rooms and routes players to them.
///
/// Two maps: rooms keyed by join code, and a player index so `call` and
/// `mark` resolve to their room without scanning. A player can be in at
/// most ONE room at a time (key invariant).
///
/// Construction hands back a completion receiver; every room announces
/// its code there when its actor exits, and the server feeds those codes
/// into [`remove_finished`](Self::remove_finished).
pub struct RoomRegistry {
    config: RoomConfig,

    /// Active rooms, keyed by join code.
    rooms: HashMap<RoomCode, RoomHandle>,

    /// Maps each player to the room they're currently in.
    players: HashMap<PlayerId, RoomCode>,

    /// Cloned into every spawned room actor.
    done_tx: mpsc::UnboundedSender<RoomCode>,
}

impl RoomRegistry {
    /// Creates an empty registry and the channel finished rooms report on.
    pub fn new(
        config: RoomConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RoomCode>) {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let registry = Self {
            config,
            rooms: HashMap::new(),
            players: HashMap::new(),
            done_tx,
        };
        (registry, done_rx)
    }

    /// Opens a new room with `player` seated as host and returns its
    /// join code.
    pub fn create_room(
        &mut self,
        player: PlayerId,
        username: String,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        if self.players.contains_key(&player) {
            return Err(RoomError::AlreadyInRoom(player));
        }

        let code = self.generate_code();
        let handle = spawn_room(
            code.clone(),
            self.config.clone(),
            player,
            username,
            sender,
            self.done_tx.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle);
        self.players.insert(player, code.clone());
        tracing::info!(room = %code, %player, "room created");
        Ok(code)
    }

    /// Seats `player` in the room under `code`.
    ///
    /// Enforces the "one room at a time" invariant. Returns the host's
    /// username on success, for the join reply.
    pub async fn join_room(
        &mut self,
        player: PlayerId,
        username: String,
        code: &RoomCode,
        sender: PlayerSender,
    ) -> Result<String, RoomError> {
        if self.players.contains_key(&player) {
            return Err(RoomError::AlreadyInRoom(player));
        }

        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let host = handle.join(player, username, sender).await?;
        self.players.insert(player, code.clone());
        Ok(host)
    }

    /// Forwards a start request to the room under `code`.
    pub async fn start_game(
        &self,
        player: PlayerId,
        code: &RoomCode,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.start(player).await
    }

    /// Routes a number call from a player to their current room.
    pub async fn call_number(
        &self,
        player: PlayerId,
        number: u8,
    ) -> Result<(), RoomError> {
        self.room_of(player)?.call(player, number).await
    }

    /// Routes a mark confirmation from a player to their current room.
    pub async fn mark_number(
        &self,
        player: PlayerId,
        number: u8,
    ) -> Result<(), RoomError> {
        self.room_of(player)?.mark(player, number).await
    }

    /// Tears down the room of a departing player.
    ///
    /// The maps are purged before the room actor hears about it, so by
    /// the time the remaining peer sees `playerDisconnected` the join
    /// code already resolves to nothing. Returns the code of the room
    /// that was torn down, if the player was in one.
    pub async fn disconnect(
        &mut self,
        player: PlayerId,
    ) -> Option<RoomCode> {
        let code = self.players.remove(&player)?;
        let handle = self.rooms.remove(&code);
        self.players.retain(|_, c| *c != code);

        if let Some(handle) = handle {
            let _ = handle.disconnect(player).await;
        }
        tracing::info!(room = %code, %player, "room removed on disconnect");
        Some(code)
    }

    /// Drops a room whose actor already exited (game over, or both
    /// handles gone). No command is sent; there is nobody listening.
    pub fn remove_finished(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_some() {
            self.players.retain(|_, c| c != code);
            tracing::debug!(room = %code, "finished room removed");
        }
    }

    /// Returns the handle for a room, if it exists.
    pub fn room(&self, code: &RoomCode) -> Option<&RoomHandle> {
        self.rooms.get(code)
    }

    /// Returns the join code of the room a player is currently in.
    pub fn player_room(&self, player: &PlayerId) -> Option<&RoomCode> {
        self.players.get(player)
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn room_of(&self, player: PlayerId) -> Result<&RoomHandle, RoomError> {
        let code = self
            .players
            .get(&player)
            .ok_or(RoomError::NotInRoom(player))?;
        self.rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Draws random codes until one is not already in use.
    fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..self.config.code_len)
                .map(|_| {
                    let i = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[i] as char
                })
                .collect();
            let code = RoomCode::new(raw);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
