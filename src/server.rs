use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    api::{
        CompleteTaskRequest, SetTasksRequest, SuccessResponse, WorkingModeRequest,
        WorkingModeResponse,
    },
    reminder::ReminderDecision,
    storage::{TaskOverview, TaskStore},
};

#[derive(Clone)]
struct ServerState {
    store: Arc<dyn TaskStore>,
}

struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("Request failed. [error = {:#}]", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// JSON request body that reads a missing body, or one sent without a JSON
/// content type, as `{}`.
struct JsonBody<T>(T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let body: &[u8] = if is_json && !bytes.is_empty() {
            &bytes
        } else {
            b"{}"
        };

        match serde_json::from_slice(body) {
            Ok(value) => Ok(Self(value)),
            Err(error) => {
                let status = if error.is_data() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::BAD_REQUEST
                };
                Err((status, Json(serde_json::json!({ "error": error.to_string() }))).into_response())
            }
        }
    }
}

pub fn router(store: Arc<dyn TaskStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(get_tasks).post(set_tasks))
        .route("/api/complete-task", post(complete_task))
        .route("/api/working-mode", post(toggle_working_mode))
        .route("/api/reminder-check", get(reminder_check))
        .with_state(ServerState { store })
}

/// Serves the task API until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    store: Arc<dyn TaskStore>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    log::info!("Task server listening on http://{local_addr}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    log::info!("Task server stopped");
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_tasks(State(state): State<ServerState>) -> ApiResult<TaskOverview> {
    Ok(Json(state.store.overview().await?))
}

async fn set_tasks(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody<SetTasksRequest>,
) -> ApiResult<SuccessResponse> {
    let tasks_raw = body.tasks_raw.unwrap_or_default();
    log::info!("Saving task list. [lines = {}]", tasks_raw.lines().count());
    state.store.set_tasks(tasks_raw).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn complete_task(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody<CompleteTaskRequest>,
) -> ApiResult<SuccessResponse> {
    log::info!("Completing task. [task_id = {}]", body.task_id);
    state.store.complete_task(body.task_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn toggle_working_mode(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody<WorkingModeRequest>,
) -> ApiResult<WorkingModeResponse> {
    let working_mode_until = state.store.set_working_mode(body.is_enabled()).await?;
    Ok(Json(WorkingModeResponse { working_mode_until }))
}

async fn reminder_check(State(state): State<ServerState>) -> ApiResult<ReminderDecision> {
    Ok(Json(state.store.check_reminder().await?))
}
