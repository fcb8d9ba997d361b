/// Public library interface for the habit tracker REST service
///
/// This module exports the server bootstrap and the public types that can be
/// used by other applications or tests.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

pub mod analytics;
pub mod config;
pub mod domain;
pub mod http;
pub mod service;
pub mod storage;

// Re-export public modules and types
pub use analytics::{Statistics, StatisticsAssembler};
pub use config::{Args, ServerConfig};
pub use domain::*;
pub use http::{router, AppState};
pub use service::{HabitService, ServiceError};
pub use storage::{CompletionStore, HabitStore, MemoryStorage, SqliteStorage, Storage, StorageError};

/// Errors that can occur while starting or running the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Habit tracker server backed by a SQLite database
pub struct HabitTrackerServer {
    config: ServerConfig,
    service: Arc<HabitService<SqliteStorage>>,
}

impl HabitTrackerServer {
    /// Open (and migrate) the database named in `config`
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let span = tracing::info_span!("habit_tracker");
        tracing::info!(parent: &span, database = %config.database.display(), "opening database");

        let storage = SqliteStorage::new(&config.database)?;
        let service = HabitService::with_system_clock(storage, span);

        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }

    /// The service behind the routes (useful for testing)
    pub fn service(&self) -> &HabitService<SqliteStorage> {
        &self.service
    }

    /// The application router with middleware attached
    pub fn router(&self) -> axum::Router {
        router(AppState::new(Arc::clone(&self.service)), self.config.request_timeout)
    }

    /// Serve until ctrl-c
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // Without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
