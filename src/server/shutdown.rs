// Graceful shutdown module
// Waits for in-flight connections once the listener has been closed

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::logger;

/// How often the connection counter is re-checked while draining
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until no connection is active or `grace` has elapsed.
///
/// Returns the number of connections still open at the end; those tasks
/// are abandoned when the runtime shuts down.
pub async fn drain_connections(state: &Arc<AppState>, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    let mut remaining = state.active_connections();
    if remaining > 0 {
        logger::log_info(&format!(
            "[Shutdown] Waiting up to {}s for {remaining} connection(s)",
            grace.as_secs()
        ));
    }

    while remaining > 0 {
        tokio::select! {
            () = tokio::time::sleep(POLL_INTERVAL) => {
                remaining = state.active_connections();
            }
            () = tokio::time::sleep_until(deadline) => {
                remaining = state.active_connections();
                break;
            }
        }
    }

    logger::log_shutdown_complete(remaining);
    remaining
}
