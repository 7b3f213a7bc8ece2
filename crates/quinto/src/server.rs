//! `QuintoServer` builder and server loop.
//!
//! This is the entry point for running a quinto server. It ties together
//! all the layers: transport → protocol → room. Besides the accept loop,
//! `run` starts a reaper task that drops finished rooms from the registry
//! and, when configured, a bare TCP listener answering liveness probes.

use std::sync::Arc;

use quinto_protocol::{Codec, JsonCodec, RoomCode};
use quinto_room::{RoomConfig, RoomRegistry};
use quinto_transport::{Transport, WebSocketTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

use crate::handler::handle_connection;
use crate::ServerError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a quinto server.
///
/// # Example
///
/// ```rust,ignore
/// use quinto::prelude::*;
///
/// let server = QuintoServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuintoServerBuilder {
    bind_addr: String,
    health_addr: Option<String>,
    room_config: RoomConfig,
}

impl QuintoServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            health_addr: None,
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the game server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Serves liveness probes on a separate address.
    ///
    /// Any request on this port is answered with an empty `200 OK`.
    pub fn health(mut self, addr: &str) -> Self {
        self.health_addr = Some(addr.to_string());
        self
    }

    /// Sets the configuration applied to every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Builds the server, binding its listeners.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    pub async fn build(self) -> Result<QuintoServer<JsonCodec>, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let health = match &self.health_addr {
            Some(addr) => {
                Some(TcpListener::bind(addr).await.map_err(ServerError::Health)?)
            }
            None => None,
        };

        let (registry, finished) = RoomRegistry::new(self.room_config);
        let state = Arc::new(ServerState {
            registry: Mutex::new(registry),
            codec: JsonCodec,
        });

        Ok(QuintoServer { transport, health, state, finished })
    }
}

impl Default for QuintoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running quinto game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct QuintoServer<C: Codec> {
    transport: WebSocketTransport,
    health: Option<TcpListener>,
    state: Arc<ServerState<C>>,
    finished: mpsc::UnboundedReceiver<RoomCode>,
}

impl<C: Codec> QuintoServer<C> {
    /// Creates a new builder.
    pub fn builder() -> QuintoServerBuilder {
        QuintoServerBuilder::new()
    }

    /// Returns the local address the game listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the local address of the health listener, if configured.
    pub fn health_addr(&self) -> Option<std::io::Result<std::net::SocketAddr>> {
        self.health.as_ref().map(TcpListener::local_addr)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// connected player. Runs until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        let QuintoServer { mut transport, health, state, mut finished } = self;

        // Room actors announce their code on exit; purge them so a
        // finished room's code behaves like an unknown one.
        let reaper = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(code) = finished.recv().await {
                reaper.registry.lock().await.remove_finished(&code);
            }
        });

        if let Some(listener) = health {
            tokio::spawn(serve_health(listener));
        }

        tracing::info!("quinto server running");

        loop {
            match transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Minimal HTTP responder for load balancer probes.
///
/// Reads one buffer of request bytes and answers `200 OK` with an empty
/// body, regardless of path or method.
async fn serve_health(listener: TcpListener) {
    const RESPONSE: &[u8] =
        b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::debug!(error = %e, "health accept failed");
                continue;
            }
        };
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            if let Err(e) = stream.write_all(RESPONSE).await {
                tracing::trace!(error = %e, %addr, "health reply failed");
            }
            let _ = stream.shutdown().await;
        });
    }
}
