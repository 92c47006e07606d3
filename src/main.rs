use std::process::ExitCode;
use std::sync::Arc;

use cats_server::config::{AppState, Config};
use cats_server::{logger, server, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cats-server")]
#[command(about = "HTTP service for the cats resource")]
struct Args {
    /// Configuration file path, without extension
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Load and validate the configuration, then exit
    #[arg(short, long)]
    test_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = Config::load_from(&args.config)?;
    let addr = cfg.get_socket_addr()?;

    if args.test_config {
        // Also validates header settings and the routes (prefix, health paths)
        AppState::new(cfg)?;
        println!("configuration OK, would listen on http://{addr}");
        return Ok(());
    }

    logger::init(&cfg)?;

    // Tokio runtime, worker threads from config (CPU cores by default)
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, addr))
}

async fn async_main(cfg: Config, addr: std::net::SocketAddr) -> Result<()> {
    let state = Arc::new(AppState::new(cfg)?);
    let listener = server::create_listener(addr)?;

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    server::start_server_loop(listener, state, signals).await
}
