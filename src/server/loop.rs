// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use super::shutdown::drain_connections;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::error::Result;
use crate::logger;

/// Run the accept loop on `listener` until `signals` requests shutdown.
///
/// After shutdown the listener is closed first, so no new connection is
/// accepted. Open connections are then told to close once their in-flight
/// response is written, and get up to `performance.shutdown_timeout`
/// seconds to do so.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<()> {
    let local_addr = listener.local_addr()?;
    logger::log_server_start(&local_addr, &state.config);

    let (closing_tx, closing_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &closing_rx);
                    }
                    // Per-connection failures (EMFILE, aborted handshakes) do not stop the loop
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.shutdown.notified() => {
                logger::log_info(&format!("[Shutdown] Closing listener on {local_addr}"));
                break;
            }
        }
    }

    drop(listener);
    closing_tx.send_replace(true);

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    drain_connections(&state, grace).await;
    Ok(())
}
