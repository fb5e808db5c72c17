//! Relay server — routes typed JSON envelopes between WebSocket clients.
//!
//! Clients connect on `/websocket` and exchange envelopes: broadcast to all,
//! private to one, echo back, and liveness ping/pong. A health endpoint on
//! `/health` reports the live connection count.
//!
//! Usage:
//!   relay-server                          # listen on 127.0.0.1:8080
//!   relay-server --port 9000              # custom port
//!   relay-server --static-dir ./static    # serve files under /static
//!   relay-server --max-connections 64     # cap concurrent connections

use std::path::PathBuf;

use clap::Parser;
use relay_server::RelayServer;
use relay_transport::{TransportConfig, TransportServer, WEBSOCKET_PATH};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relay-server", about = "WebSocket message relay server")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Maximum concurrent connections (unlimited if not set)
    #[arg(long)]
    max_connections: Option<usize>,

    /// Serve files from this directory under /static
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = TransportConfig {
        port: cli.port,
        hostname: cli.hostname.clone(),
        max_connections: cli.max_connections,
        static_dir: cli.static_dir,
    };

    let mut transport = match TransportServer::start(config, RelayServer::new()).await {
        Ok(transport) => transport,
        Err(e) => {
            error!("failed to start transport: {e}");
            std::process::exit(1);
        }
    };

    let port = transport.port();
    println!();
    println!("  Relay server running!");
    println!();
    println!(
        "  WebSocket endpoint: ws://{}:{}{}",
        cli.hostname, port, WEBSOCKET_PATH
    );
    println!("  Health check:       http://{}:{}/health", cli.hostname, port);
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    let _ = tokio::signal::ctrl_c().await;

    println!();
    println!("  Shutting down...");
    transport.stop().await;
    println!("  Server stopped.");
}
