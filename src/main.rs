//! UserData file manager - Entry Point

use log::{error, info};
use std::process::ExitCode;

use trackmania_server_fm::utils::logging::setup_logging;
use trackmania_server_fm::{FileManagerConfig, Server};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match FileManagerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    setup_logging(config.log_level_filter());

    info!("Launching UserData file manager...");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
