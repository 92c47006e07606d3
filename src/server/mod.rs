// Server module entry
// Listener setup, connection serving, signals and graceful shutdown

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), so it is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
