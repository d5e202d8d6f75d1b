// Server module entry point
// Listener creation, accept loop, and per-connection serving

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept loop: hands each incoming connection to a spawned local task.
///
/// Runs until the process is terminated; accept errors are logged and the
/// loop keeps going.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(stream, peer_addr, &state, &active_connections);
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
