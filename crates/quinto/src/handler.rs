//! Per-connection handler: decode commands, route them to rooms, and
//! forward room events back down the socket.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The connection id doubles as the player id, so a player's identity
//! lives exactly as long as their socket. The loop selects between
//! inbound frames and the outbound queue the player's room writes into;
//! when the socket goes away, a drop guard tears down the player's room
//! membership even if the task unwinds.

use std::sync::Arc;

use quinto_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use quinto_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::ServerError;

/// Drop guard that removes a player from their room when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct DisconnectGuard<C: Codec> {
    player: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player = self.player;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.registry.lock().await.disconnect(player).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ServerError> {
    let player = PlayerId(conn.id().into_inner());
    tracing::debug!(%player, "handling new connection");

    // The player's room pushes events here; only this task touches the
    // socket, so frames go out in the order the room produced them.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

    let _guard = DisconnectGuard {
        player,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player, error = %e, "recv error");
                        break;
                    }
                };

                let msg: ClientMessage = match state.codec.decode(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(
                            %player, error = %e, "failed to decode message"
                        );
                        continue;
                    }
                };

                dispatch(&conn, &state, player, &outbound_tx, msg).await?;
            }

            Some(event) = outbound_rx.recv() => {
                let bytes = state.codec.encode(&event)?;
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        }
    }

    // _guard drops here → room disconnect fires.
    Ok(())
}

/// Routes one decoded client command.
///
/// Create and join answer directly on the connection, success or error.
/// In-game commands are fire-and-forget: an invalid call or mark is
/// dropped where it lands and the sender hears nothing, same as a call
/// arriving after the game ended.
async fn dispatch<C: Codec>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<C>>,
    player: PlayerId,
    outbound: &mpsc::UnboundedSender<ServerMessage>,
    msg: ClientMessage,
) -> Result<(), ServerError> {
    match msg {
        ClientMessage::CreateRoom { username } => {
            let Some(username) = clean_username(&username) else {
                return send_error(conn, &state.codec, "username required")
                    .await;
            };

            let created = state.registry.lock().await.create_room(
                player,
                username.clone(),
                outbound.clone(),
            );

            match created {
                Ok(room_id) => {
                    let resp = ServerMessage::RoomCreated { room_id, username };
                    send(conn, &state.codec, &resp).await
                }
                Err(e) => send_error(conn, &state.codec, &e.to_string()).await,
            }
        }

        ClientMessage::JoinRoom { username, room_id } => {
            let Some(username) = clean_username(&username) else {
                return send_error(conn, &state.codec, "username required")
                    .await;
            };

            // Lock held across the room round-trip. The actor never
            // calls back into the registry, so this cannot deadlock.
            let joined = state
                .registry
                .lock()
                .await
                .join_room(player, username.clone(), &room_id, outbound.clone())
                .await;

            match joined {
                Ok(host) => {
                    let resp = ServerMessage::JoinedRoom {
                        room_id,
                        host,
                        username,
                    };
                    send(conn, &state.codec, &resp).await
                }
                Err(e) => send_error(conn, &state.codec, &e.to_string()).await,
            }
        }

        ClientMessage::StartGame { room_id } => {
            let result =
                state.registry.lock().await.start_game(player, &room_id).await;
            if let Err(e) = result {
                tracing::debug!(
                    %player, room = %room_id, error = %e, "start dropped"
                );
            }
            Ok(())
        }

        ClientMessage::CallNumber { number } => {
            let result =
                state.registry.lock().await.call_number(player, number).await;
            if let Err(e) = result {
                tracing::debug!(%player, number, error = %e, "call dropped");
            }
            Ok(())
        }

        ClientMessage::MarkNumber { number } => {
            let result =
                state.registry.lock().await.mark_number(player, number).await;
            if let Err(e) = result {
                tracing::debug!(%player, number, error = %e, "mark dropped");
            }
            Ok(())
        }
    }
}

/// Trims surrounding whitespace; `None` when nothing remains.
fn clean_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Encodes a message and writes it straight to the connection.
async fn send<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    msg: &ServerMessage,
) -> Result<(), ServerError> {
    let bytes = codec.encode(msg)?;
    conn.send(&bytes).await.map_err(ServerError::Transport)?;
    Ok(())
}

/// Sends a `ServerMessage::Error` to this client only.
async fn send_error<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    message: &str,
) -> Result<(), ServerError> {
    let msg = ServerMessage::Error {
        message: message.to_string(),
    };
    send(conn, codec, &msg).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_username_trims_whitespace() {
        assert_eq!(clean_username("  ada  "), Some("ada".to_string()));
        assert_eq!(clean_username("grace"), Some("grace".to_string()));
    }

    #[test]
    fn test_clean_username_rejects_empty() {
        assert_eq!(clean_username(""), None);
        assert_eq!(clean_username("   "), None);
        assert_eq!(clean_username("\t\n"), None);
    }
}
