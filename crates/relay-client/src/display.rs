//! Terminal rendering of incoming envelopes and local notices.

/// Banner printed once the server's welcome envelope arrives.
pub fn welcome(connection_id: &str, timestamp: &str, message: &str) {
    println!();
    println!("{}", "=".repeat(50));
    println!("{message}");
    println!("Your connection ID: {connection_id}");
    println!("Connected at: {timestamp}");
    println!("{}", "=".repeat(50));
    commands();
}

pub fn pong(timestamp: &str, original_timestamp: Option<&str>) {
    match original_timestamp {
        Some(original) => println!("Pong received at {timestamp} (original: {original})"),
        None => println!("Pong received at {timestamp}"),
    }
}

pub fn broadcast(from: &str, message: &str, timestamp: &str) {
    println!("[{timestamp}] Broadcast from {from}: {message}");
}

pub fn private(from: &str, message: &str, timestamp: &str) {
    println!("[{timestamp}] Private message from {from}: {message}");
}

pub fn echo(original_message: &str, timestamp: &str) {
    println!("[{timestamp}] Echo: {original_message}");
}

pub fn user_joined(connection_id: &str, total_connections: usize) {
    println!("User {connection_id} joined (total: {total_connections})");
}

pub fn user_left(connection_id: &str, total_connections: usize) {
    println!("User {connection_id} left (total: {total_connections})");
}

pub fn error(message: &str, timestamp: &str) {
    println!("[{timestamp}] Error: {message}");
}

/// Fallback for kinds the client has no dedicated rendering for.
pub fn unhandled(kind: &str, raw: &str) {
    println!("Received message [{kind}]: {raw}");
}

/// Fallback for frames that do not decode at all.
pub fn raw(line: &str) {
    println!("Received: {line}");
}

pub fn commands() {
    println!();
    println!("Available commands:");
    println!("  help                     - Show this help message");
    println!("  ping                     - Send ping to server");
    println!("  broadcast <message>      - Broadcast message to all clients");
    println!("  private <id> <message>   - Send private message to specific client");
    println!("  echo <message>           - Echo message back from server");
    println!("  status                   - Show connection status");
    println!("  quit                     - Disconnect and exit");
    println!();
}

pub fn status(connected: bool, connection_id: Option<&str>, url: &str) {
    println!();
    println!("Connection status:");
    println!("  Connected: {}", if connected { "yes" } else { "no" });
    println!("  Connection ID: {}", connection_id.unwrap_or("N/A"));
    println!("  Server: {url}");
    println!();
}

pub fn not_connected() {
    println!("Not connected to server");
}
