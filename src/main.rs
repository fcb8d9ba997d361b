/// Main entry point for the habit tracker REST service
///
/// This file sets up logging, parses command line arguments, and starts the
/// HTTP server.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_tracker_api::{Args, HabitTrackerServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over the flags
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_tracker_api={level},tower_http={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit tracker server");

    let config = ServerConfig::from_args(&args)?;
    info!(database = %config.database.display(), addr = %config.addr, "resolved configuration");

    let server = HabitTrackerServer::new(config)?;
    server.run().await?;

    info!("Habit tracker server shutdown complete");
    Ok(())
}
