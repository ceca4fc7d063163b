use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use futures::StreamExt;
use futures::channel::mpsc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::assist;
use crate::cache::SuggestionCache;
use crate::error::AppError;
use crate::metrics::AssistMetrics;
use crate::models::task::{NewTask, SortKey, TaskPatch};
use crate::provider::Provider;
use crate::store::TaskStore;
use crate::streaming::sse;
use crate::validation::{validate_new_task, validate_task_patch, validate_text_input};

pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub store: Arc<TaskStore>,
    pub metrics: AssistMetrics,
    pub tag_cache: SuggestionCache,
    pub temperature: f32,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/assist/parse", post(parse_task))
        .route("/assist/tags", post(suggest_tags))
        .route("/assist/enhance", post(enhance_task))
        .route("/assist/subtasks", post(suggest_subtasks))
        .route("/assist/context", post(contextual_info))
        .route("/metrics", get(metrics_snapshot))
        .with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamError(_) | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Request failed: {}", self);
        (status, self.to_string()).into_response()
    }
}

fn error_kind(error: &AppError) -> &'static str {
    match error {
        AppError::MissingApiKey => "missing_credential",
        AppError::InvalidRequest(_) => "invalid_request",
        AppError::UpstreamError(_) => "upstream_error",
        AppError::MalformedResponse(_) => "malformed_response",
        _ => "internal_error",
    }
}

// ---- Task CRUD ----

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    sort: SortKey,
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(state.store.list(query.sort))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewTask>,
) -> Result<impl IntoResponse, AppError> {
    validate_new_task(&new)?;
    let task = state.store.create(new)?;
    info!(task_id = %task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.get(id)?))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<impl IntoResponse, AppError> {
    validate_task_patch(&patch)?;
    Ok(Json(state.store.update(id, patch)?))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Non-streaming assist ----

#[derive(Debug, Deserialize)]
struct ParseRequest {
    input: String,
}

async fn parse_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_text_input("input", &req.input)?;
    state.metrics.record_parse();

    let today = chrono::Utc::now().date_naive();
    let fields = assist::parse_task_input(
        state.provider.as_ref(),
        state.temperature,
        &req.input,
        today,
    )
    .await?;
    Ok(Json(fields))
}

#[derive(Debug, Deserialize)]
struct TaskTextRequest {
    title: String,
    #[serde(default)]
    description: String,
}

async fn suggest_tags(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskTextRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_text_input("title", &req.title)?;
    state.metrics.record_tags();

    let tags = assist::suggest_tags(
        state.provider.as_ref(),
        &state.tag_cache,
        state.temperature,
        &req.title,
        &req.description,
    )
    .await?;
    Ok(Json(tags))
}

async fn metrics_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

// ---- Streaming assist (SSE) ----

#[derive(Debug, Deserialize)]
struct EnhanceRequest {
    input: String,
}

fn sse_response(rx: mpsc::UnboundedReceiver<Bytes>) -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/event-stream")
        .header("Cache-Control", "no-cache")
        .header("Connection", "keep-alive")
        .body(Body::from_stream(rx.map(Ok::<_, std::io::Error>)))
        .unwrap()
}

async fn enhance_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Response<Body>, AppError> {
    validate_text_input("input", &req.input)?;

    let (tx, rx) = mpsc::unbounded();
    tokio::spawn(async move {
        let started = Instant::now();
        let result = assist::enhance_task(
            state.provider.as_ref(),
            state.temperature,
            &req.input,
            |event| {
                let _ = tx.unbounded_send(Bytes::from(sse::assist_event(&event)));
            },
        )
        .await;

        match result {
            Ok(split) => {
                state.metrics.record_stream_session(started.elapsed());
                let _ = tx.unbounded_send(Bytes::from(sse::done_event(&json!({
                    "title": split.title,
                    "body": split.body,
                }))));
            }
            Err(e) => {
                state.metrics.record_stream_failure();
                error!("Enhance stream failed: {}", e);
                let _ = tx.unbounded_send(Bytes::from(sse::format_error(
                    error_kind(&e),
                    &e.to_string(),
                )));
            }
        }
    });

    Ok(sse_response(rx))
}

async fn suggest_subtasks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskTextRequest>,
) -> Result<Response<Body>, AppError> {
    validate_text_input("title", &req.title)?;

    let (tx, rx) = mpsc::unbounded();
    tokio::spawn(async move {
        let started = Instant::now();
        let result = assist::suggest_subtasks(
            state.provider.as_ref(),
            state.temperature,
            &req.title,
            &req.description,
            |event| {
                let _ = tx.unbounded_send(Bytes::from(sse::assist_event(&event)));
            },
        )
        .await;

        match result {
            Ok(text) => {
                state.metrics.record_stream_session(started.elapsed());
                let _ = tx.unbounded_send(Bytes::from(sse::done_event(&json!({ "text": text }))));
            }
            Err(e) => {
                state.metrics.record_stream_failure();
                error!("Sub-task stream failed: {}", e);
                let _ = tx.unbounded_send(Bytes::from(sse::format_error(
                    error_kind(&e),
                    &e.to_string(),
                )));
            }
        }
    });

    Ok(sse_response(rx))
}

async fn contextual_info(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskTextRequest>,
) -> Result<Response<Body>, AppError> {
    validate_text_input("title", &req.title)?;

    let (tx, rx) = mpsc::unbounded();
    tokio::spawn(async move {
        let started = Instant::now();
        let result = assist::fetch_contextual_info(
            state.provider.as_ref(),
            state.temperature,
            &req.title,
            &req.description,
            |event| {
                let _ = tx.unbounded_send(Bytes::from(sse::assist_event(&event)));
            },
        )
        .await;

        match result {
            Ok(info) => {
                state.metrics.record_stream_session(started.elapsed());
                let _ = tx.unbounded_send(Bytes::from(sse::done_event(&json!({
                    "text": info.text,
                }))));
            }
            Err(e) => {
                state.metrics.record_stream_failure();
                error!("Contextual info stream failed: {}", e);
                let _ = tx.unbounded_send(Bytes::from(sse::format_error(
                    error_kind(&e),
                    &e.to_string(),
                )));
            }
        }
    });

    Ok(sse_response(rx))
}
