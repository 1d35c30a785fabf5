use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    state::AppState,
    subjects::{
        dto::{
            AttendanceStats, CreateSubjectRequest, DeleteAttendanceRequest, MessageResponse,
            StatusQuery, StatusResponse, UpsertAttendanceRequest,
        },
        repo::{Attendance, Subject},
    },
};

pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject).get(list_subjects))
        .route("/:subject_id", delete(delete_subject))
        .route(
            "/:subject_id/attendance",
            post(upsert_attendance)
                .get(get_stats)
                .delete(delete_attendance),
        )
        .route("/:subject_id/attendance/status", get(get_status))
}

/// Loads the subject, yielding 404 when it is absent or owned by another user.
async fn owned_subject(
    state: &AppState,
    user_id: Uuid,
    subject_id: Uuid,
) -> Result<Subject, ApiError> {
    Subject::find_owned(&state.db, user_id, subject_id)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, %subject_id, "subject not found or not owned");
            ApiError::NotFound("Subject not found".into())
        })
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_subject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<Json<Subject>, ApiError> {
    let subject = Subject::create(&state.db, user.id, &payload.name)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::Conflict("Subject with this name already exists for this user".into())
            }
            other => ApiError::Internal(other.into()),
        })?;
    info!(subject_id = %subject.id, name = %subject.name, "subject created");
    Ok(Json(subject))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_subjects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = Subject::list_by_user(&state.db, user.id).await?;
    Ok(Json(subjects))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_subject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let subject = owned_subject(&state, user.id, subject_id).await?;
    Subject::delete_with_attendance(&state.db, subject.id).await?;
    info!(%subject_id, "subject deleted");
    Ok(Json(MessageResponse {
        message: "Subject deleted successfully",
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn upsert_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<Uuid>,
    Json(payload): Json<UpsertAttendanceRequest>,
) -> Result<Json<Attendance>, ApiError> {
    let subject = owned_subject(&state, user.id, subject_id).await?;
    let record = Attendance::upsert(&state.db, subject.id, payload.date, payload.status).await?;
    info!(%subject_id, date = %payload.date, status = ?payload.status, "attendance recorded");
    Ok(Json(record))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<AttendanceStats>, ApiError> {
    let subject = owned_subject(&state, user.id, subject_id).await?;
    let (total, attended) = Attendance::counts(&state.db, subject.id).await?;
    Ok(Json(AttendanceStats::from_counts(total, attended)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let subject = owned_subject(&state, user.id, subject_id).await?;
    let record = Attendance::find_by_date(&state.db, subject.id, query.date).await?;
    Ok(Json(StatusResponse {
        status: record.map(|r| r.status),
    }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(subject_id): Path<Uuid>,
    Json(payload): Json<DeleteAttendanceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let subject = owned_subject(&state, user.id, subject_id).await?;
    let deleted = Attendance::delete_by_date(&state.db, subject.id, payload.date).await?;
    if !deleted {
        return Err(ApiError::NotFound("Attendance record not found".into()));
    }
    info!(%subject_id, date = %payload.date, "attendance deleted");
    Ok(Json(MessageResponse {
        message: "Attendance record deleted successfully",
    }))
}
