//! Dataflow Studio - headless host for the dataflow editor

mod canvas;
mod config;
mod constants;
mod session;

use std::env;
use std::io;
use std::process::ExitCode;

use config::AppConfig;
use session::Session;

fn main() -> ExitCode {
    // Initialize logging - RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Dataflow Studio starting...");

    let path = AppConfig::path();
    if env::args().skip(1).any(|arg| arg == "--write-default-config") {
        return match AppConfig::default().save(&path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Failed to write {:?}: {}", path, e);
                ExitCode::FAILURE
            }
        };
    }

    let config = AppConfig::load_or_default(&path);
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = session.run(stdin.lock(), &mut stdout) {
        log::error!("Session ended with an I/O error: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!(
        "Dataflow Studio stopped ({} nodes on canvas)",
        session.graph().node_count()
    );
    ExitCode::SUCCESS
}
