/// Public library interface for the Habit Stats MCP server
///
/// This module exports the server implementation and the public types used
/// by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod analytics;
mod domain;
mod mcp;
mod storage;
mod tools;

// Re-export public modules and types
pub use analytics::{
    AnalyticsEngine, AnalyticsError, CompletionStat, DateRange, RankedHabit, WeeklyStat,
};
pub use domain::*;
pub use storage::{HabitQueries, HabitStore, SqliteStorage, StorageError};
pub use tools::*;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit stats server exposed over the MCP protocol
///
/// Owns the SQLite storage and the analytics engine. The engine is
/// stateless; every statistic is computed from a fresh store query.
pub struct HabitServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
}

impl HabitServer {
    /// Create a new habit stats server with the specified database path
    ///
    /// This initializes the SQLite database with the required schema if it
    /// doesn't already exist - the only place schema setup ever happens.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Stats server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let analytics = AnalyticsEngine::new();

        Ok(Self { storage, analytics })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until the server is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let users = self.storage.list_users()?;
        tracing::info!(
            "Server started successfully, found {} registered users",
            users.len()
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
