//! Client-side connector.

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};

use crate::server::WEBSOCKET_PATH;

/// A connected client-side WebSocket stream.
pub type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where the client connects.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 8080,
        }
    }
}

impl ClientConfig {
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, WEBSOCKET_PATH)
    }
}

/// Open one connection attempt against the relay server. Retry policy is
/// the caller's concern.
pub async fn connect(config: &ClientConfig) -> Result<ClientStream, tungstenite::Error> {
    let (stream, _response) = connect_async(config.url()).await?;
    Ok(stream)
}
