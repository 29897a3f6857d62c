//! Fetch wrappers for the task API. Any transport failure or non-2xx status is an `Err`.

use shared::{task_path, CreateTaskRequest, Task, TaskId, UpdateTaskRequest, TASKS_PATH};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

pub async fn fetch_tasks() -> Result<Vec<Task>, String> {
    let text = send("GET", TASKS_PATH, None).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

pub async fn create_task(task_text: String) -> Result<Task, String> {
    let body = serde_json::to_string(&CreateTaskRequest::new(task_text))
        .map_err(|_| "Failed to serialize request")?;

    let text = send("POST", TASKS_PATH, Some(body)).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

pub async fn update_task(id: TaskId, task_text: String, is_completed: bool) -> Result<Task, String> {
    let request = UpdateTaskRequest {
        task_text,
        is_completed,
    };
    let body = serde_json::to_string(&request).map_err(|_| "Failed to serialize request")?;

    let text = send("PUT", &task_path(id), Some(body)).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

pub async fn delete_task(id: TaskId) -> Result<(), String> {
    send("DELETE", &task_path(id), None).await.map(|_| ())
}

async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|_| "Failed to create request")?;

    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| "Failed to set header")?;
    }

    let window = web_sys::window().ok_or("No window available")?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{} {} failed: {:?}", method, url, e))?
        .into();

    let text_promise = response.text().map_err(|_| "Failed to read response")?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| "Failed to get text")?
        .as_string()
        .ok_or("Failed to convert to string")?;

    if !response.ok() {
        return Err(format!("{} {} returned {}: {}", method, url, response.status(), text));
    }

    Ok(text)
}
