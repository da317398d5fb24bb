// Potluck Registry - REST API with Axum
//
// Handlers stay thin: decode the request, run the workflow call on the
// blocking pool (store calls do file I/O and may wait on the write gate),
// and map `StoreError` onto a status code with a `{"detail": ...}` body.

use crate::entities::{Entry, EntryRef};
use crate::error::{StoreError, StoreResult};
use crate::summary::CategorySummary;
use crate::workflow::{export_file_name, Potluck};
use axum::{
    extract::{Form, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub potluck: Arc<Potluck>,
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct AdminResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<Entry>,
}

impl AdminResponse {
    fn ok() -> Self {
        Self {
            success: true,
            removed: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub password: String,
    pub index: i64,
    pub entry: Entry,
    /// Fingerprint of the entry the client saw at `index`
    #[serde(default)]
    pub expected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub password: String,
    pub index: i64,
    #[serde(default)]
    pub expected: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn internal() -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Internal storage error".to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_client_error() {
            let status = match err {
                StoreError::Unauthorized => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_REQUEST,
            };
            return ApiError {
                status,
                detail: err.to_string(),
            };
        }

        match err {
            StoreError::Contended { .. } => {
                error!(error = %err, "write gate timed out");
                ApiError {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    detail: "Store busy, try again".to_string(),
                }
            }
            _ => {
                error!(error = %err, "persistence failure");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "blocking task failed");
            Err(ApiError::internal())
        }
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// POST /submit - Register a contribution
async fn submit_entry(
    State(state): State<AppState>,
    Json(entry): Json<Entry>,
) -> ApiResult<Json<MessageResponse>> {
    let potluck = state.potluck.clone();
    run_blocking(move || potluck.submit(entry)).await?;
    Ok(Json(MessageResponse {
        message: "Entry saved",
    }))
}

/// GET /entries - All entries in insertion order
async fn list_entries(State(state): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    let potluck = state.potluck.clone();
    Ok(Json(run_blocking(move || potluck.entries()).await?))
}

/// GET /entries/refs - Entries with the index and fingerprint needed to edit them
async fn list_entry_refs(State(state): State<AppState>) -> ApiResult<Json<Vec<EntryRef>>> {
    let potluck = state.potluck.clone();
    Ok(Json(run_blocking(move || potluck.entry_refs()).await?))
}

/// GET /categories
async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.potluck.categories().labels().to_vec())
}

/// GET /summary - Entries grouped by category with total quantities
async fn category_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategorySummary>>> {
    let potluck = state.potluck.clone();
    Ok(Json(run_blocking(move || potluck.summary()).await?))
}

// ============================================================================
// Admin handlers
// ============================================================================

/// POST /admin/login - form field `password`
async fn admin_login(
    State(state): State<AppState>,
    Form(form): Form<PasswordForm>,
) -> ApiResult<Json<AdminResponse>> {
    state.potluck.login(&form.password)?;
    Ok(Json(AdminResponse::ok()))
}

/// GET /admin/download?password=... - The data file as an attachment
async fn admin_download(
    State(state): State<AppState>,
    Query(query): Query<PasswordForm>,
) -> ApiResult<Response> {
    let potluck = state.potluck.clone();
    let password = query.password;
    let bytes = run_blocking(move || potluck.export(&password)).await?;

    let filename = export_file_name(state.potluck.store().path(), chrono::Utc::now());
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// POST /admin/edit
async fn admin_edit(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<AdminResponse>> {
    let potluck = state.potluck.clone();
    run_blocking(move || {
        potluck.edit(&req.password, req.index, req.entry, req.expected.as_deref())
    })
    .await?;
    Ok(Json(AdminResponse::ok()))
}

/// POST /admin/delete
async fn admin_delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<AdminResponse>> {
    let potluck = state.potluck.clone();
    let removed = run_blocking(move || {
        potluck.delete(&req.password, req.index, req.expected.as_deref())
    })
    .await?;
    Ok(Json(AdminResponse {
        success: true,
        removed: Some(removed),
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/submit", post(submit_entry))
        .route("/entries", get(list_entries))
        .route("/entries/refs", get(list_entry_refs))
        .route("/categories", get(list_categories))
        .route("/summary", get(category_summary))
        .route("/admin/login", post(admin_login))
        .route("/admin/download", get(admin_download))
        .route("/admin/edit", post(admin_edit))
        .route("/admin/delete", post(admin_delete))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
