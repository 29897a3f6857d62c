use std::sync::Arc;

use chrono::Utc;
use shared::{Task, TaskId};
use tokio::sync::RwLock;

use super::{StoreError, TaskStore};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Task>,
    last_id: TaskId,
}

/// In-process task table with the same ordering and timestamp rules as MySQL.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl TaskStore for MemoryTaskStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.table.read().await.rows.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn create(&self, task_text: &str) -> Result<Task, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let task = Task {
            id: table.last_id,
            task_text: task_text.to_string(),
            is_completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        table.rows.push(task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        id: TaskId,
        task_text: &str,
        is_completed: bool,
    ) -> Result<Option<Task>, StoreError> {
        let mut table = self.table.write().await;
        let Some(task) = table.rows.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.task_text = task_text.to_string();
        task.is_completed = is_completed;
        task.completed_at = is_completed.then(Utc::now);
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: TaskId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|task| task.id != id);
        Ok(table.rows.len() < before)
    }

    async fn close(&self) {}
}
