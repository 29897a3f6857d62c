//! Client-side copy of the task list, kept free of browser types so it can be
//! unit tested natively.

use shared::{Task, TaskId};

/// Trims user input; `None` when nothing but whitespace was entered.
pub fn trimmed_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Drops everything and takes the server's list as-is.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Flips the row's completed marker. The stored text is left alone.
    pub fn mark_completed(&mut self, id: TaskId, is_completed: bool) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.is_completed = is_completed;
                true
            }
            None => false,
        }
    }

    pub fn rename(&mut self, id: TaskId, task_text: String) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.task_text = task_text;
                true
            }
            None => false,
        }
    }
}
