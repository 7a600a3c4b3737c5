//! Feed Health Monitor Server Entry Point

use health_monitor::{bootstrap, cli::Cli, logging, server};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = Cli::load().into_config();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        check_interval = ?config.check_interval,
        check_timeout = ?config.check_timeout,
        check_concurrency = config.check_concurrency,
        "Starting feed health monitor"
    );

    let state = match bootstrap::initialize(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(state, &config.bind_addr()).await {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
