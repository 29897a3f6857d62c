use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::ErrorResponse;
use thiserror::Error;

use crate::store::StoreError;

/// Which route a store failure happened on; picks the public 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch tasks",
            Self::Create => "Failed to create task",
            Self::Update => "Failed to update task",
            Self::Delete => "Failed to delete task",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task text is required")]
    TaskTextRequired,

    #[error("{0}")]
    InvalidBody(String),

    #[error("Task not found")]
    TaskNotFound,

    #[error("{}", .operation.failure_message())]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(operation: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TaskTextRequired | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::TaskNotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The cause stays in the server log; clients only see the operation message.
        if let Self::Store { operation, source } = &self {
            tracing::error!(?operation, error = %source, "store operation failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
