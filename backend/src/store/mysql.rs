use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::{Task, TaskId};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{FromRow, MySqlPool};

use super::{StoreError, TaskStore};
use crate::config::DatabaseConfig;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INT AUTO_INCREMENT PRIMARY KEY,
        task_text VARCHAR(255) NOT NULL,
        is_completed BOOLEAN DEFAULT FALSE,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        completed_at TIMESTAMP NULL
    )
"#;

/// Requests beyond `max_connections` wait for a free connection instead of failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const LIST_TASKS: &str = r#"
    SELECT id, task_text, is_completed, created_at, completed_at
    FROM tasks
    ORDER BY created_at DESC, id DESC
"#;

const SELECT_TASK: &str = r#"
    SELECT id, task_text, is_completed, created_at, completed_at
    FROM tasks
    WHERE id = ?
"#;

#[derive(Debug, FromRow)]
struct TaskRecord {
    id: i32,
    task_text: String,
    is_completed: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            task_text: record.task_text,
            is_completed: record.is_completed,
            created_at: record.created_at,
            completed_at: record.completed_at,
        }
    }
}

/// Task store backed by a MySQL connection pool.
///
/// Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct MySqlTaskStore {
    pool: MySqlPool,
}

impl MySqlTaskStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and checks that the server is reachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = pool_options(config)
            .connect_with(config.connect_options())
            .await?;

        tracing::debug!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            "connected to MySQL"
        );
        Ok(Self::new(pool))
    }
}

pub fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

impl TaskStore for MySqlTaskStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let records: Vec<TaskRecord> = sqlx::query_as(LIST_TASKS).fetch_all(&self.pool).await?;

        Ok(records.into_iter().map(Task::from).collect())
    }

    async fn create(&self, task_text: &str) -> Result<Task, StoreError> {
        // No RETURNING in MySQL: insert and read back on the same transaction.
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO tasks (task_text) VALUES (?)")
            .bind(task_text)
            .execute(&mut *tx)
            .await?;
        let id = inserted.last_insert_id();

        let record: Option<TaskRecord> = sqlx::query_as(SELECT_TASK)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        record
            .map(Task::from)
            .ok_or(StoreError::MissingAfterInsert(id))
    }

    async fn update(
        &self,
        id: TaskId,
        task_text: &str,
        is_completed: bool,
    ) -> Result<Option<Task>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE tasks
            SET task_text = ?,
                is_completed = ?,
                completed_at = CASE WHEN ? THEN CURRENT_TIMESTAMP ELSE NULL END
            WHERE id = ?
            "#,
        )
        .bind(task_text)
        .bind(is_completed)
        .bind(is_completed)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // rows_affected() counts changed rows only, so existence is decided by the read-back.
        let record: Option<TaskRecord> = sqlx::query_as(SELECT_TASK)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record.map(Task::from))
    }

    async fn delete(&self, id: TaskId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
