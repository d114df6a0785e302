//! HTTP surface: the index page plus a small JSON API over the registry.

mod page;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use habit_core::registry::parse_target;
use habit_core::{AppError, Clock, HabitRegistry, HabitSnapshot};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use page::render_index;

pub type SharedClock = Box<dyn Clock + Send + Sync>;

/// Shared application state. The mutex serializes every mutate-and-persist.
pub struct AppState {
    registry: Mutex<HabitRegistry<SharedClock>>,
}

impl AppState {
    pub fn new(registry: HabitRegistry<SharedClock>) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }
}

pub fn router(registry: HabitRegistry<SharedClock>) -> Router {
    let state = Arc::new(AppState::new(registry));

    Router::new()
        .route("/", get(index))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}/increment", post(increment_task))
        .route("/api/tasks/{id}", delete(delete_task))
        .with_state(state)
}

/// Serves until Ctrl+C, then drops the registry.
pub async fn serve(
    registry: HabitRegistry<SharedClock>,
    bind: &str,
    port: u16,
) -> Result<(), AppError> {
    let listener = TcpListener::bind((bind, port))
        .await
        .map_err(|err| AppError::io(format!("cannot listen on {bind}:{port}: {err}")))?;
    let addr = listener.local_addr()?;
    info!(store = %registry.path().display(), "habit tracker running at http://{addr}");

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let habits = state.registry.lock().list_todays_tasks();
    Html(render_index(&habits))
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<HabitSnapshot>> {
    Json(state.registry.lock().list_todays_tasks())
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target: Option<Value>,
}

/// Runs a mutate-and-persist on the blocking pool so file writes never
/// stall the async workers.
async fn with_registry<T, F>(state: Arc<AppState>, op: F) -> Result<T, AppError>
where
    F: FnOnce(&mut HabitRegistry<SharedClock>) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut registry = state.registry.lock();
        op(&mut registry)
    })
    .await
    .map_err(|err| AppError::io(format!("registry task failed: {err}")))?
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<HabitSnapshot>, ApiError> {
    let Json(request) = payload.map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;
    let name = request
        .name
        .ok_or_else(|| AppError::invalid_input("name is required"))?;
    let target = target_from_json(request.target.as_ref())?;
    let snapshot = with_registry(state, move |registry| registry.create_task(&name, target)).await?;
    Ok(Json(snapshot))
}

async fn increment_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HabitSnapshot>, ApiError> {
    let snapshot = with_registry(state, move |registry| registry.increment_task(&id)).await?;
    Ok(Json(snapshot))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let removed = with_registry(state, move |registry| registry.delete_task(&id)).await?;
    if removed {
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        let body = json!({ "success": false, "error": "Task not found" });
        Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
    }
}

/// Accepts the target as a JSON number or a numeric string.
fn target_from_json(value: Option<&Value>) -> Result<u32, AppError> {
    match value {
        None | Some(Value::Null) => Err(AppError::invalid_input("target is required")),
        Some(Value::String(raw)) => parse_target(raw),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|target| u32::try_from(target).ok())
            .filter(|target| *target > 0)
            .ok_or_else(|| AppError::invalid_input(format!("target {number} is not a positive integer"))),
        Some(other) => Err(AppError::invalid_input(format!(
            "target {other} is not a positive integer"
        ))),
    }
}

pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidData(_) | AppError::Io(_) => {
                warn!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match self.0 {
            AppError::NotFound(_) => "Task not found",
            ref other => other.message(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
