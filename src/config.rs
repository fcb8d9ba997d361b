/// Command line and environment configuration
///
/// Every flag can also be supplied through an environment variable so the
/// server can run unattended in a container.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

/// Command line arguments for the habit tracker server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_TRACKER_DB")]
    pub database: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "HABIT_TRACKER_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Seconds before an unfinished request is answered with 408
    #[arg(long, env = "HABIT_TRACKER_REQUEST_TIMEOUT", default_value_t = 60)]
    pub request_timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log filter directive implied by the flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "trace"
        } else if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Resolved settings the server is started with
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database: PathBuf,
    pub addr: SocketAddr,
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Resolve arguments, creating the database directory when needed
    pub fn from_args(args: &Args) -> std::io::Result<Self> {
        let database = match &args.database {
            Some(path) => {
                ensure_parent_dir(path)?;
                path.clone()
            }
            None => default_database_path()?,
        };

        Ok(Self {
            database,
            addr: args.addr,
            request_timeout: Duration::from_secs(args.request_timeout),
        })
    }
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// First writable location among home, data and config dirs, then the cwd
///
/// Falls back to the system temp dir when none of them can be written.
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_tracker")),
        dirs::data_dir().map(|p| p.join("habit_tracker")),
        dirs::config_dir().map(|p| p.join("habit_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".habit_tracker")),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join("habits.db"));
        }
    }

    let fallback = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&fallback)?;
    tracing::warn!(path = %fallback.display(), "using temporary directory for database");
    Ok(fallback.join("habits.db"))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let probe = dir.join(".write_probe");
    let writable = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}
