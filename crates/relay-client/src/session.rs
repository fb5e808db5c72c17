//! Client session — one connection attempt at a time, a fixed-delay
//! reconnect loop, and the interactive command loop.
//!
//! Two concurrent activities share the connection: the receive loop renders
//! incoming envelopes, the command loop turns operator input into outgoing
//! envelopes. They communicate only through the session's connected state
//! and the outbound send.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use relay_protocol::Envelope;
use relay_transport::client::{self, ClientConfig, ClientStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::commands::Command;
use crate::display;

/// Delay between reconnect attempts — the sole retry policy in the system.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Outcome of one connected stretch.
enum Disconnect {
    /// Operator asked to quit; end the session.
    Quit,
    /// The server went away; schedule a reconnect.
    Lost,
}

pub struct ClientSession {
    config: ClientConfig,
    /// Assigned by the server's welcome envelope; shown in `status`.
    connection_id: Option<String>,
}

impl ClientSession {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            connection_id: None,
        }
    }

    /// Run until the operator quits. `commands` delivers one operator input
    /// line per entry (fed by the blocking stdin reader thread in the
    /// binary).
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<String>) {
        loop {
            match client::connect(&self.config).await {
                Ok(stream) => {
                    println!("Connected to {}", self.config.url());
                    match self.drive(stream, &mut commands).await {
                        Disconnect::Quit => return,
                        Disconnect::Lost => {
                            self.connection_id = None;
                            println!(
                                "Connection lost, reconnecting in {}s...",
                                RECONNECT_DELAY.as_secs()
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!("connect failed: {e}");
                    println!(
                        "Could not reach {}, retrying in {}s...",
                        self.config.url(),
                        RECONNECT_DELAY.as_secs()
                    );
                }
            }

            if self.wait_for_reconnect(&mut commands).await {
                return;
            }
        }
    }

    /// Sit out the reconnect delay. Commands arriving while disconnected
    /// are answered locally and never queued. Returns true if the operator
    /// quit during the wait.
    async fn wait_for_reconnect(&self, commands: &mut mpsc::UnboundedReceiver<String>) -> bool {
        let deadline = tokio::time::sleep(RECONNECT_DELAY);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => return false,
                maybe_line = commands.recv() => {
                    let Some(line) = maybe_line else {
                        // stdin closed; just wait out the delay
                        (&mut deadline).await;
                        return false;
                    };
                    match Command::parse(&line) {
                        Some(Command::Quit) => {
                            println!("Goodbye.");
                            return true;
                        }
                        Some(Command::Help) => display::commands(),
                        Some(Command::Status) => {
                            display::status(false, None, &self.config.url())
                        }
                        Some(_) => display::not_connected(),
                        None => {}
                    }
                }
            }
        }
    }

    /// Pump one established connection until it drops or the operator
    /// quits.
    async fn drive(
        &mut self,
        mut stream: ClientStream,
        commands: &mut mpsc::UnboundedReceiver<String>,
    ) -> Disconnect {
        loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => self.handle_incoming(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => return Disconnect::Lost,
                    Some(Ok(_)) => {} // ping/pong control frames are handled by the library
                    Some(Err(e)) => {
                        warn!("websocket error: {e}");
                        return Disconnect::Lost;
                    }
                },
                maybe_line = commands.recv() => {
                    let Some(line) = maybe_line else {
                        // stdin closed; treat as an orderly quit
                        let _ = stream.close(None).await;
                        return Disconnect::Quit;
                    };
                    if let Some(command) = Command::parse(&line) {
                        if let Some(exit) = self.handle_command(command, &mut stream).await {
                            return exit;
                        }
                    }
                }
            }
        }
    }

    fn handle_incoming(&mut self, raw: &str) {
        let envelope = match Envelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("undecodable frame: {e}");
                display::raw(raw);
                return;
            }
        };

        match envelope {
            Envelope::Welcome {
                connection_id,
                timestamp,
                message,
            } => {
                self.connection_id = Some(connection_id.clone());
                display::welcome(&connection_id, &timestamp, &message);
            }
            Envelope::Pong {
                timestamp,
                original_timestamp,
            } => display::pong(&timestamp, original_timestamp.as_deref()),
            Envelope::Broadcast {
                from,
                message,
                timestamp,
            } => display::broadcast(
                from.as_deref().unwrap_or("unknown"),
                &message,
                timestamp.as_deref().unwrap_or(""),
            ),
            Envelope::Private {
                from,
                message,
                timestamp,
                ..
            } => display::private(
                from.as_deref().unwrap_or("unknown"),
                &message,
                timestamp.as_deref().unwrap_or(""),
            ),
            Envelope::Echo {
                original_message,
                timestamp,
                ..
            } => display::echo(
                original_message.as_deref().unwrap_or(""),
                timestamp.as_deref().unwrap_or(""),
            ),
            Envelope::UserJoined {
                connection_id,
                total_connections,
                ..
            } => {
                // The server excludes the joiner from its own join
                // broadcast; keep the guard for servers that do not.
                if self.connection_id.as_deref() != Some(connection_id.as_str()) {
                    display::user_joined(&connection_id, total_connections);
                }
            }
            Envelope::UserLeft {
                connection_id,
                total_connections,
                ..
            } => display::user_left(&connection_id, total_connections),
            Envelope::Error { message, timestamp } => display::error(&message, &timestamp),
            other => display::unhandled(other.kind(), raw),
        }
    }

    /// Returns `Some` when the command ends the connected stretch.
    async fn handle_command(
        &mut self,
        command: Command,
        stream: &mut ClientStream,
    ) -> Option<Disconnect> {
        match command {
            Command::Help => display::commands(),
            Command::Status => {
                display::status(true, self.connection_id.as_deref(), &self.config.url())
            }
            Command::Quit => {
                let _ = stream.close(None).await;
                println!("Disconnected from server");
                return Some(Disconnect::Quit);
            }
            Command::Ping => {
                if self.send(stream, &Envelope::ping()).await {
                    println!("Ping sent");
                }
            }
            Command::Broadcast(message) => {
                if self.send(stream, &Envelope::broadcast(message.clone())).await {
                    println!("Broadcast sent: {message}");
                }
            }
            Command::Private { target_id, message } => {
                let envelope = Envelope::private_to(target_id.clone(), message.clone());
                if self.send(stream, &envelope).await {
                    println!("Private message sent to {target_id}: {message}");
                }
            }
            Command::Echo(message) => {
                if self.send(stream, &Envelope::echo(message.clone())).await {
                    println!("Echo sent: {message}");
                }
            }
            Command::Usage(usage) => println!("{usage}"),
            Command::Unknown => {
                println!("Unknown command. Type 'help' for available commands.")
            }
        }
        None
    }

    async fn send(&mut self, stream: &mut ClientStream, envelope: &Envelope) -> bool {
        match stream.send(Message::Text(envelope.to_json().into())).await {
            Ok(()) => true,
            Err(e) => {
                // The receive side will observe the broken stream and
                // trigger the reconnect path.
                warn!("send failed: {e}");
                false
            }
        }
    }
}
