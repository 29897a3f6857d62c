use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i32;

/// Collection endpoint for tasks.
pub const TASKS_PATH: &str = "/api/tasks";

pub fn task_path(id: TaskId) -> String {
    format!("{}/{}", TASKS_PATH, id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_text: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// `completed_at` is set exactly when the task is completed.
    pub fn is_consistent(&self) -> bool {
        self.is_completed == self.completed_at.is_some()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task_text: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(task_text: impl Into<String>) -> Self {
        Self {
            task_text: Some(task_text.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_text: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
