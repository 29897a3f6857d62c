use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Task, TaskId};
use web_sys::{console, window};

pub mod api;
pub mod state;

use state::{trimmed_text, TaskList};

/// User action that can fail; picks the alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Add,
    Update,
    Delete,
}

impl Action {
    pub fn alert_message(self) -> &'static str {
        match self {
            Action::Load => "Error loading tasks. See console for details.",
            Action::Add => "Error adding task. See console for details.",
            Action::Update => "Error updating task. See console for details.",
            Action::Delete => "Error deleting task. See console for details.",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTasks,
    TasksLoaded(Vec<Task>),
    SetInput(String),
    AddTask,
    TaskAdded,
    ToggleTask(TaskId),
    TaskToggled(TaskId, bool),
    EditTask(TaskId),
    TaskRenamed(TaskId, String),
    DeleteTask(TaskId),
    Failed(Action, String),
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    tasks: TaskList,
    input: String,
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTasks => Cmd::new(async {
                match api::fetch_tasks().await {
                    Ok(tasks) => Msg::TasksLoaded(tasks),
                    Err(e) => Msg::Failed(Action::Load, e),
                }
            }),
            Msg::TasksLoaded(tasks) => {
                self.tasks.replace(tasks);
                Cmd::none()
            }
            Msg::SetInput(value) => {
                self.input = value;
                Cmd::none()
            }
            Msg::AddTask => {
                let Some(task_text) = trimmed_text(&self.input) else {
                    return Cmd::none();
                };
                Cmd::new(async move {
                    match api::create_task(task_text).await {
                        Ok(_) => Msg::TaskAdded,
                        Err(e) => Msg::Failed(Action::Add, e),
                    }
                })
            }
            Msg::TaskAdded => {
                // The input is only cleared once the server accepted the task.
                self.input.clear();
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::ToggleTask(id) => {
                let Some(task) = self.tasks.get(id) else {
                    return Cmd::none();
                };
                let task_text = task.task_text.clone();
                let is_completed = !task.is_completed;
                Cmd::new(async move {
                    match api::update_task(id, task_text, is_completed).await {
                        Ok(_) => Msg::TaskToggled(id, is_completed),
                        Err(e) => Msg::Failed(Action::Update, e),
                    }
                })
            }
            Msg::TaskToggled(id, is_completed) => {
                self.tasks.mark_completed(id, is_completed);
                Cmd::none()
            }
            Msg::EditTask(id) => {
                let Some(task) = self.tasks.get(id) else {
                    return Cmd::none();
                };
                let Some(task_text) = prompt_for_text(&task.task_text) else {
                    return Cmd::none();
                };
                let is_completed = task.is_completed;
                Cmd::new(async move {
                    match api::update_task(id, task_text.clone(), is_completed).await {
                        Ok(_) => Msg::TaskRenamed(id, task_text),
                        Err(e) => Msg::Failed(Action::Update, e),
                    }
                })
            }
            Msg::TaskRenamed(id, task_text) => {
                self.tasks.rename(id, task_text);
                Cmd::none()
            }
            Msg::DeleteTask(id) => Cmd::new(async move {
                match api::delete_task(id).await {
                    Ok(()) => Msg::LoadTasks,
                    Err(e) => Msg::Failed(Action::Delete, e),
                }
            }),
            Msg::Failed(action, error) => {
                console::error_1(&format!("Error: {}", error).into());
                if let Some(window) = window() {
                    let _ = window.alert_with_message(action.alert_message());
                }
                Cmd::none()
            }
            Msg::Ignore => Cmd::none(),
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("container")],
            [
                h1([], [text("Todo List")]),
                div(
                    [class("input-section")],
                    [
                        input(
                            [
                                r#type("text"),
                                id("taskInput"),
                                placeholder("Add a new task..."),
                                value(&self.input),
                                on_input(|event| Msg::SetInput(event.value())),
                                on_keypress(|event| {
                                    if event.key() == "Enter" {
                                        Msg::AddTask
                                    } else {
                                        Msg::Ignore
                                    }
                                }),
                            ],
                            [],
                        ),
                        button([id("addTask"), on_click(|_| Msg::AddTask)], [text("Add Task")]),
                    ],
                ),
                ul(
                    [id("taskList")],
                    self.tasks.iter().map(|task| self.view_task(task)).collect::<Vec<_>>(),
                ),
            ],
        )
    }
}

impl Model {
    fn view_task(&self, task: &Task) -> Node<Msg> {
        let task_id = task.id;

        li(
            [
                key(task_id.to_string()),
                attr("data-id", task_id.to_string()),
                class(if task.is_completed { "completed" } else { "" }),
            ],
            [
                input(
                    [
                        r#type("checkbox"),
                        checked(task.is_completed),
                        on_click(move |event| {
                            // The row re-renders from the model once the server confirms.
                            event.prevent_default();
                            Msg::ToggleTask(task_id)
                        }),
                    ],
                    [],
                ),
                span([], [text(&task.task_text)]),
                div(
                    [class("task-actions")],
                    [
                        button(
                            [class("update-btn"), on_click(move |_| Msg::EditTask(task_id))],
                            [text("Update")],
                        ),
                        button(
                            [class("delete-btn"), on_click(move |_| Msg::DeleteTask(task_id))],
                            [text("Delete")],
                        ),
                    ],
                ),
            ],
        )
    }
}

/// Blocking prompt prefilled with the current text. Cancel or blank input gives `None`.
fn prompt_for_text(current: &str) -> Option<String> {
    let response = window()?
        .prompt_with_message_and_default("Update your task:", current)
        .ok()
        .flatten()?;
    trimmed_text(&response)
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
