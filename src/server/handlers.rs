// HTTP request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::TeddyServer;
use crate::analysis::AnalysisReport;
use crate::errors::StoreError;
use crate::notify::Channel;
use crate::store::{CbtRecommendation, JournalEntry, NewEntry};

/// Create the main application router
pub fn create_router(server: Arc<TeddyServer>) -> Router {
    Router::new()
        .route("/v1/entries", post(create_entry))
        .route("/v1/entries/:id", get(get_entry).delete(delete_entry))
        .route("/v1/entries/:id/reflection", post(add_reflection))
        .route("/v1/entries/:id/reanalyze", post(reanalyze_entry))
        .route("/v1/users/:id/entries", get(list_entries))
        .route("/v1/notifications/claim", post(claim_notification))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Request body for POST /v1/entries
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub anxiety_level: u8,
}

/// Response body carrying an entry and its analysis outcome
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry: JournalEntry,
    pub report: AnalysisReport,
}

/// Handle POST /v1/entries - save a new entry and analyze it
async fn create_entry(
    State(server): State<Arc<TeddyServer>>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let (entry, report) = server
        .pipeline()
        .save_and_analyze(NewEntry {
            user_id: request.user_id,
            title: request.title,
            content: request.content,
            anxiety_level: request.anxiety_level,
        })
        .await?;

    // Re-read: the analysis ran after the insert
    let entry = server.store().entry(entry.id)?;
    Ok((StatusCode::CREATED, Json(EntryResponse { entry, report })))
}

/// Entry detail including its recommendation rows
#[derive(Debug, Serialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub recommendations: Vec<CbtRecommendation>,
}

/// Handle GET /v1/entries/:id
async fn get_entry(
    State(server): State<Arc<TeddyServer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryDetail>, AppError> {
    let entry = server.store().entry(id)?;
    let recommendations = server.store().recommendations(id)?;
    Ok(Json(EntryDetail {
        entry,
        recommendations,
    }))
}

/// Handle GET /v1/users/:id/entries
async fn list_entries(
    State(server): State<Arc<TeddyServer>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    Ok(Json(server.store().entries_for_user(&user_id)?))
}

/// Request body for POST /v1/entries/:id/reflection
#[derive(Debug, Deserialize)]
pub struct ReflectionRequest {
    pub reflection: String,
}

/// Handle POST /v1/entries/:id/reflection
async fn add_reflection(
    State(server): State<Arc<TeddyServer>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReflectionRequest>,
) -> Result<Json<JournalEntry>, AppError> {
    server.store().add_reflection(id, &request.reflection)?;
    Ok(Json(server.store().entry(id)?))
}

/// Handle POST /v1/entries/:id/reanalyze
async fn reanalyze_entry(
    State(server): State<Arc<TeddyServer>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = server.pipeline().analyze_entry(id).await?;
    Ok(Json(report))
}

/// Handle DELETE /v1/entries/:id
async fn delete_entry(
    State(server): State<Arc<TeddyServer>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if server.store().delete_entry(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError(StoreError::EntryNotFound(id)))
    }
}

/// Request body for POST /v1/notifications/claim
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub channel: Channel,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    /// False when the user already received this channel's
    /// notification today; the caller must not send another
    pub granted: bool,
}

/// Handle POST /v1/notifications/claim - atomically claim today's
/// notification slot for a (channel, user) pair
async fn claim_notification(
    State(server): State<Arc<TeddyServer>>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, AppError> {
    let granted = server.tracker().track(request.channel, &request.user_id)?;
    Ok(Json(ClaimResponse { granted }))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model: String,
}

/// Handle GET /health
async fn health_check(State(server): State<Arc<TeddyServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        model: server.model().to_string(),
    })
}

/// Error wrapper mapping store errors onto HTTP status codes
pub struct AppError(StoreError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::EntryNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidAnxietyLevel(_) | StoreError::UnknownChannel(_) => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Sqlite(_) | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = serde_json::json!({
            "error": {
                "message": self.0.to_string(),
                "type": "api_error"
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}
