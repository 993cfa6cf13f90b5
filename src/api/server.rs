//! HTTP server implementation for the task API.
//!
//! This module provides the axum-based HTTP server that exposes the REST
//! endpoints for managing tasks, plus the health probe.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, patch, put},
};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::db::{Database, now_iso};
use crate::error::{ApiError, ApiResult};
use crate::types::Task;

/// API server state shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    /// Reference to the task database.
    db: Arc<Database>,
    /// Storage location reported by the health endpoint.
    db_path: String,
}

impl ApiServer {
    /// Create a new API server instance.
    pub fn new(db: Arc<Database>, db_path: String) -> Self {
        Self { db, db_path }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    db_file: String,
    timestamp: String,
}

/// Payload for creating a task. A null description is accepted and
/// stored as the empty string.
#[derive(Debug, Deserialize)]
struct TaskCreate {
    title: Option<String>,
    description: Option<String>,
}

/// Payload for replacing a task. `completed` must be spelled out here;
/// the completion toggle is the endpoint that defaults it.
#[derive(Debug, Deserialize)]
struct TaskReplace {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

/// Query parameters for the completion toggle.
#[derive(Debug, Deserialize)]
struct CompleteParams {
    complete: Option<bool>,
}

/// Validate a title: present and non-empty.
fn validate_title(title: Option<String>) -> ApiResult<String> {
    match title {
        None => Err(ApiError::missing_field("title")),
        Some(title) if title.is_empty() => {
            Err(ApiError::invalid_value("title", "title must not be empty"))
        }
        Some(title) => Ok(title),
    }
}

/// Health check endpoint. Verifies the database answers a trivial query.
async fn health(State(state): State<ApiServer>) -> ApiResult<Json<HealthResponse>> {
    state.db().ping()?;

    Ok(Json(HealthResponse {
        status: "ok",
        db_file: state.db_path.clone(),
        timestamp: now_iso(),
    }))
}

/// API root - returns available endpoints.
async fn api_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "tasks": "/api/tasks",
        }
    }))
}

/// List all tasks, most recent first.
async fn list_tasks(State(state): State<ApiServer>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.db().list_tasks()?;
    Ok(Json(tasks))
}

/// Create a new task.
async fn create_task(
    State(state): State<ApiServer>,
    payload: Result<Json<TaskCreate>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;
    let title = validate_title(payload.title)?;
    let description = payload.description.unwrap_or_default();

    let task = state.db().create_task(&title, &description)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replace every mutable field of an existing task.
async fn replace_task(
    State(state): State<ApiServer>,
    Path(task_id): Path<i64>,
    payload: Result<Json<TaskReplace>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;
    let title = validate_title(payload.title)?;
    let completed = payload
        .completed
        .ok_or_else(|| ApiError::missing_field("completed"))?;
    let description = payload.description.unwrap_or_default();

    let task = state
        .db()
        .replace_task(task_id, &title, &description, completed)?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;
    Ok(Json(task))
}

/// Set a task's completion flag. Defaults to marking complete when the
/// `complete` query parameter is omitted.
async fn complete_task(
    State(state): State<ApiServer>,
    Path(task_id): Path<i64>,
    params: Result<Query<CompleteParams>, QueryRejection>,
) -> ApiResult<Json<Task>> {
    let Query(params) = params.map_err(|e| ApiError::invalid_value("complete", &e.body_text()))?;
    let completed = params.complete.unwrap_or(true);

    let task = state
        .db()
        .set_completed(task_id, completed)?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;
    Ok(Json(task))
}

/// Delete a task permanently.
async fn delete_task(
    State(state): State<ApiServer>,
    Path(task_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.db().delete_task(task_id)? {
        return Err(ApiError::task_not_found(task_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Build the router with all routes.
pub fn build_router(state: ApiServer, cors_origins: &[String]) -> Router {
    // Only the configured origins may call the API from a browser
    let mut origins = Vec::new();
    for origin in cors_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => warn!("Ignoring invalid CORS origin: {}", origin),
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{task_id}",
            put(replace_task).delete(delete_task),
        )
        .route("/api/tasks/{task_id}/complete", patch(complete_task))
        .route("/api", get(api_root))
        .route("/api/health", get(health))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and serve until the process is interrupted.
///
/// Binds the configured address, logs the bound address, and drains
/// in-flight requests on Ctrl-C before returning.
pub async fn start_server(db: Arc<Database>, config: &ServerConfig) -> anyhow::Result<()> {
    let state = ApiServer::new(db, config.db_path.display().to_string());
    let app = build_router(state, &config.cors_origins);

    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid bind host: {}", config.host))?;
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(host, config.port)).await?;

    info!("Task API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, draining in-flight requests");
    }
}
