use std::path::Path as FsPath;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use shared::{CreateTaskRequest, MessageResponse, Task, TaskId, UpdateTaskRequest};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, Operation};
use crate::store::TaskStore;

/// API routes under `/api/tasks`; anything else is served from `static_dir`.
pub fn create_router<S: TaskStore>(store: S, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/api/tasks/:id", put(update_task::<S>).delete(delete_task::<S>))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(store)
}

async fn list_tasks<S: TaskStore>(State(store): State<S>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = store
        .list()
        .await
        .map_err(ApiError::store(Operation::List))?;

    Ok(Json(tasks))
}

async fn create_task<S: TaskStore>(
    State(store): State<S>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task_text = payload
        .ok()
        .and_then(|Json(request)| request.task_text)
        .filter(|text| !text.is_empty())
        .ok_or(ApiError::TaskTextRequired)?;

    let task = store
        .create(&task_text)
        .await
        .map_err(ApiError::store(Operation::Create))?;

    tracing::debug!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task<S: TaskStore>(
    id: Result<Path<TaskId>, PathRejection>,
    State(store): State<S>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::TaskNotFound)?;
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let task = store
        .update(id, &request.task_text, request.is_completed)
        .await
        .map_err(ApiError::store(Operation::Update))?
        .ok_or(ApiError::TaskNotFound)?;

    tracing::debug!(id, is_completed = task.is_completed, "task updated");
    Ok(Json(task))
}

async fn delete_task<S: TaskStore>(
    id: Result<Path<TaskId>, PathRejection>,
    State(store): State<S>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::TaskNotFound)?;

    let deleted = store
        .delete(id)
        .await
        .map_err(ApiError::store(Operation::Delete))?;

    if !deleted {
        return Err(ApiError::TaskNotFound);
    }

    tracing::debug!(id, "task deleted");
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
