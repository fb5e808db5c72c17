//! Relay client — interactive terminal for the relay server.
//!
//! Usage:
//!   relay-client                          # connect to localhost:8080
//!   relay-client --host 10.0.0.5 --port 9000

use clap::Parser;
use relay_client::ClientSession;
use relay_transport::ClientConfig;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relay-client", about = "Interactive WebSocket relay client")]
struct Cli {
    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Keep the interactive console quiet unless asked otherwise.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Blocking stdin read on a dedicated thread; the async side receives
    // complete lines over the channel.
    let (command_tx, command_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if command_tx.send(line).is_err() {
                        return;
                    }
                }
                Err(_) => return,
            }
        }
    });

    let config = ClientConfig {
        host: cli.host,
        port: cli.port,
    };
    ClientSession::new(config).run(command_rx).await;

    std::process::exit(0);
}
