//! WebSocket transport server using Axum.
//!
//! Handles the HTTP upgrade on the relay path, spawns one writer task per
//! connection, and forwards lifecycle and message events to the relay core
//! through the `ConnectionHooks` trait.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        ConnectInfo, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use relay_protocol::{ConnectionId, timestamp};
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::sender::ConnectionSender;

/// Path the relay accepts WebSocket upgrades on. Connections to any other
/// path are refused before a handshake completes.
pub const WEBSOCKET_PATH: &str = "/websocket";

/// Trait implemented by the relay server core.
/// The transport layer calls this for every connection event and text frame.
pub trait ConnectionHooks: Send + Sync + 'static {
    /// A connection completed the upgrade. Returns the id assigned to it.
    fn on_open(&self, remote_addr: String, sender: ConnectionSender) -> ConnectionId;

    /// A text frame arrived from the given connection.
    fn on_message(
        &self,
        id: &ConnectionId,
        raw: &str,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// The connection closed or its transport failed.
    fn on_close(&self, id: &ConnectionId);

    /// Number of currently registered connections (health endpoint).
    fn active_connections(&self) -> usize;
}

/// Transport server configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Maximum concurrent connections (unlimited if `None`)
    pub max_connections: Option<usize>,
    /// Directory served under `/static`, if any
    pub static_dir: Option<PathBuf>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            hostname: "127.0.0.1".into(),
            max_connections: None,
            static_dir: None,
        }
    }
}

/// Shared state for the transport server.
struct AppState<H: ConnectionHooks> {
    hooks: Arc<H>,
    config: TransportConfig,
}

/// The transport server — accepts WebSocket connections and pumps frames
/// between sockets and the relay core.
pub struct TransportServer {
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Actual bound port
    port: u16,
}

impl TransportServer {
    /// Start the transport server with the given connection hooks.
    pub async fn start<H: ConnectionHooks>(
        config: TransportConfig,
        hooks: H,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let state = Arc::new(AppState {
            hooks: Arc::new(hooks),
            config: config.clone(),
        });

        let mut app = Router::new()
            .route(WEBSOCKET_PATH, get(ws_upgrade_handler::<H>))
            .route("/health", get(health_handler::<H>));
        if let Some(dir) = &config.static_dir {
            app = app.nest_service("/static", ServeDir::new(dir));
        }
        let app = app.with_state(state);

        let addr: SocketAddr = format!("{}:{}", config.hostname, config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        info!(
            "relay transport listening on ws://{}:{}{}",
            config.hostname, actual_port, WEBSOCKET_PATH
        );

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .ok();
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gracefully stop the server.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("relay transport server stopped");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn ws_upgrade_handler<H: ConnectionHooks>(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState<H>>>,
) -> impl IntoResponse {
    // Check connection limit
    if let Some(max) = state.config.max_connections {
        let current = state.hooks.active_connections();
        if current >= max {
            warn!("connection rejected: max connections reached ({max})");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_connection(socket, peer, state))
        .into_response()
}

async fn health_handler<H: ConnectionHooks>(
    State(state): State<Arc<AppState<H>>>,
) -> impl IntoResponse {
    Json(json!({
        "status": "UP",
        "timestamp": timestamp::now(),
        "activeConnections": state.hooks.active_connections(),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// WebSocket Connection Handler
// ─────────────────────────────────────────────────────────────────────────────

async fn handle_connection<H: ConnectionHooks>(
    socket: WebSocket,
    peer: SocketAddr,
    state: Arc<AppState<H>>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Single writer per connection: every outbound frame, whether from this
    // connection's own handlers or from another connection's broadcast, is
    // queued here and written by this task alone.
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if ws_tx.send(message).await.is_err() {
                break;
            }
        }
    });

    let id = state
        .hooks
        .on_open(peer.to_string(), ConnectionSender::new(tx.clone()));

    while let Some(incoming) = ws_rx.next().await {
        match incoming {
            Ok(Message::Text(text)) => {
                state.hooks.on_message(&id, text.as_str()).await;
            }
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => {
                debug!("close frame from {id}");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("websocket error for {id}: {e}");
                break;
            }
        }
    }

    state.hooks.on_close(&id);

    // Dropping the local sender lets the writer drain and exit once the
    // registry's clone is gone too.
    drop(tx);
    let _ = writer.await;
}
