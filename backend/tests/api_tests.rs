//! HTTP contract tests, driven through the router with an in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::{fixture, rstest};
use serde_json::{json, Value};
use shared::{Task, TaskId};
use tasklist_backend::{bootstrap, create_router, MemoryTaskStore, StoreError, TaskStore};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    store: MemoryTaskStore,
    router: Router,
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn list(&self) -> Vec<Task> {
        let (status, body) = self.send(get("/api/tasks")).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body).unwrap()
    }

    async fn create(&self, text: &str) -> Task {
        let (status, body) = self
            .send(json_request("POST", "/api/tasks", json!({ "task_text": text })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(body).unwrap()
    }

    async fn update(&self, id: TaskId, text: &str, is_completed: bool) -> (StatusCode, Value) {
        self.send(json_request(
            "PUT",
            &format!("/api/tasks/{}", id),
            json!({ "task_text": text, "is_completed": is_completed }),
        ))
        .await
    }

    async fn delete(&self, id: TaskId) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/tasks/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[fixture]
fn app() -> TestApp {
    let store = MemoryTaskStore::new();
    let router = create_router(store.clone(), "does-not-exist");
    TestApp { store, router }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Failing store
// =============================================================================

#[derive(Clone)]
struct UnreachableStore;

fn store_down() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

impl TaskStore for UnreachableStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Err(store_down())
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Err(store_down())
    }

    async fn create(&self, _task_text: &str) -> Result<Task, StoreError> {
        Err(store_down())
    }

    async fn update(
        &self,
        _id: TaskId,
        _task_text: &str,
        _is_completed: bool,
    ) -> Result<Option<Task>, StoreError> {
        Err(store_down())
    }

    async fn delete(&self, _id: TaskId) -> Result<bool, StoreError> {
        Err(store_down())
    }

    async fn close(&self) {}
}

// =============================================================================
// List
// =============================================================================

mod list {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn empty_store_returns_empty_array(app: TestApp) {
        let (status, body) = app.send(get("/api/tasks")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[rstest]
    #[tokio::test]
    async fn tasks_come_back_newest_first(app: TestApp) {
        let first = app.create("first").await;
        let second = app.create("second").await;
        let third = app.create("third").await;

        let ids: Vec<TaskId> = app.list().await.iter().map(|task| task.id).collect();
        assert_eq!(ids, [third.id, second.id, first.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn count_reflects_creates_minus_deletes(app: TestApp) {
        let mut created = Vec::new();
        for n in 0..5 {
            created.push(app.create(&format!("task {}", n)).await);
        }
        app.delete(created[1].id).await;
        app.delete(created[3].id).await;

        let remaining = app.list().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|task| task.id != created[1].id && task.id != created[3].id));
    }
}

// =============================================================================
// Create
// =============================================================================

mod create {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn returns_201_with_fresh_task(app: TestApp) {
        let (status, body) = app
            .send(json_request("POST", "/api/tasks", json!({ "task_text": "buy milk" })))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task_text"], "buy milk");
        assert_eq!(body["is_completed"], false);
        assert!(body["completed_at"].is_null());
        assert!(body["id"].is_i64());
        assert!(body["created_at"].is_string());
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_unique_and_creation_times_ordered(app: TestApp) {
        let first = app.create("a").await;
        let second = app.create("b").await;

        assert_ne!(first.id, second.id);
        assert!(first.created_at <= second.created_at);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "task_text": "" }))]
    #[case(json!({ "task_text": null }))]
    #[case(json!({ "task_text": 42 }))]
    #[tokio::test]
    async fn missing_text_is_rejected(app: TestApp, #[case] payload: Value) {
        let (status, body) = app.send(json_request("POST", "/api/tasks", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Task text is required" }));
        assert!(app.store.is_empty().await);
    }

    #[rstest]
    #[tokio::test]
    async fn non_json_body_is_rejected(app: TestApp) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/tasks")
            .body(Body::from("task_text=buy+milk"))
            .unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task text is required");
    }
}

// =============================================================================
// Update
// =============================================================================

mod update {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn completing_sets_completed_at(app: TestApp) {
        let task = app.create("write report").await;

        let (status, body) = app.update(task.id, "write report", true).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_completed"], true);
        assert!(body["completed_at"].is_string());
    }

    #[rstest]
    #[tokio::test]
    async fn reopening_clears_completed_at(app: TestApp) {
        let task = app.create("write report").await;
        app.update(task.id, "write report", true).await;

        let (status, body) = app.update(task.id, "write report", false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_completed"], false);
        assert!(body["completed_at"].is_null());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn repeated_updates_keep_timestamp_consistent(app: TestApp, #[case] is_completed: bool) {
        let task = app.create("stretch").await;

        for _ in 0..3 {
            let (status, body) = app.update(task.id, "stretch", is_completed).await;
            assert_eq!(status, StatusCode::OK);
            let updated: Task = serde_json::from_value(body).unwrap();
            assert!(updated.is_consistent());
        }
    }

    #[rstest]
    #[tokio::test]
    async fn text_changes_but_creation_time_does_not(app: TestApp) {
        let task = app.create("draft").await;

        let (_, body) = app.update(task.id, "final", false).await;
        let updated: Task = serde_json::from_value(body).unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.task_text, "final");
        assert_eq!(updated.created_at, task.created_at);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_id_is_404(app: TestApp) {
        let (status, body) = app.update(404, "ghost", true).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Task not found" }));
    }

    #[rstest]
    #[tokio::test]
    async fn incomplete_body_is_400(app: TestApp) {
        let task = app.create("x").await;

        let (status, body) = app
            .send(json_request(
                "PUT",
                &format!("/api/tasks/{}", task.id),
                json!({ "task_text": "x" }),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Delete
// =============================================================================

mod delete {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn removes_the_task(app: TestApp) {
        let task = app.create("temp").await;

        let (status, body) = app.delete(task.id).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Task deleted successfully" }));
        assert!(app.list().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_id_is_404_and_changes_nothing(app: TestApp) {
        app.create("keep me").await;

        let (status, body) = app.delete(12345).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Task not found" }));
        assert_eq!(app.list().await.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn second_delete_is_404(app: TestApp) {
        let task = app.create("once").await;

        assert_eq!(app.delete(task.id).await.0, StatusCode::OK);
        assert_eq!(app.delete(task.id).await.0, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn non_numeric_id_is_404(app: TestApp) {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/tasks/abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }
}

// =============================================================================
// Store failures
// =============================================================================

mod store_failures {
    use super::*;

    fn failing_app() -> TestApp {
        TestApp {
            store: MemoryTaskStore::new(),
            router: create_router(UnreachableStore, "does-not-exist"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn every_operation_maps_to_500_with_generic_message() {
        let app = failing_app();

        let (status, body) = app.send(get("/api/tasks")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch tasks" }));

        let (status, body) = app
            .send(json_request("POST", "/api/tasks", json!({ "task_text": "x" })))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to create task" }));

        let (status, body) = app.update(1, "x", true).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to update task" }));

        let (status, body) = app.delete(1).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to delete task" }));
    }

    #[rstest]
    #[tokio::test]
    async fn validation_runs_before_the_store() {
        let app = failing_app();

        let (status, _) = app
            .send(json_request("POST", "/api/tasks", json!({ "task_text": "" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// End to end
// =============================================================================

#[rstest]
#[tokio::test]
async fn buy_milk_lifecycle(app: TestApp) {
    let (status, created) = app
        .send(json_request("POST", "/api/tasks", json!({ "task_text": "buy milk" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_completed"], false);
    assert!(created["completed_at"].is_null());
    let id = created["id"].as_i64().unwrap() as TaskId;

    let (status, updated) = app.update(id, "buy milk", true).await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["completed_at"].is_string());

    let tasks = app.list().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].task_text, "buy milk");
    assert!(tasks[0].is_completed);
    assert!(tasks[0].completed_at.is_some());

    let (status, _) = app.delete(id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(get("/api/tasks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Startup
// =============================================================================

mod startup {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn bootstrap_succeeds_on_a_reachable_store() {
        assert!(bootstrap(&MemoryTaskStore::new()).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_failure_is_reported_as_initialization_error() {
        let error = bootstrap(&UnreachableStore).await.unwrap_err();

        assert_eq!(error.to_string(), "Database initialization failed");
        assert!(error.downcast_ref::<StoreError>().is_some());
    }
}
