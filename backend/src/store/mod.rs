//! Persistence for tasks.
//!
//! Handlers only see [`TaskStore`]; the server runs on [`MySqlTaskStore`] and the
//! HTTP tests run on [`MemoryTaskStore`].

use std::future::Future;

use shared::{Task, TaskId};
use thiserror::Error;

mod memory;
mod mysql;

pub use memory::MemoryTaskStore;
pub use mysql::{pool_options, MySqlTaskStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("task {0} was not readable after insert")]
    MissingAfterInsert(u64),
}

pub trait TaskStore: Clone + Send + Sync + 'static {
    /// Creates the tasks table if it does not exist yet.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All tasks, newest `created_at` first.
    fn list(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    fn create(&self, task_text: &str) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Overwrites text and completion state. `completed_at` becomes "now" when
    /// `is_completed` is true and `None` otherwise. Returns `None` for an unknown id.
    fn update(
        &self,
        id: TaskId,
        task_text: &str,
        is_completed: bool,
    ) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Returns whether a row was removed.
    fn delete(&self, id: TaskId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn close(&self) -> impl Future<Output = ()> + Send;
}
