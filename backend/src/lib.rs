//! Task Store Service: CRUD over a single `tasks` table, exposed as JSON under `/api/tasks`.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::{Config, DatabaseConfig};
pub use error::{ApiError, Operation};
pub use routes::create_router;
pub use store::{MemoryTaskStore, MySqlTaskStore, StoreError, TaskStore};

use anyhow::Context;

/// Makes sure the tasks table exists. Every route depends on it, so callers
/// treat an error here as fatal.
pub async fn bootstrap<S: TaskStore>(store: &S) -> anyhow::Result<()> {
    store
        .ensure_schema()
        .await
        .context("Database initialization failed")?;
    tracing::info!("Database initialized");
    Ok(())
}
