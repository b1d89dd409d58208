//! Record CRUD handlers, scoped to the logged-in session's role.

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::auth::MessageResponse;
use crate::dtos::records::{
    CreateRecordRequest, CreateRecordResponse, RecordWindowQuery, UpdateRecordRequest,
};
use crate::handlers::require_session_id;
use crate::models::WeightRecord;
use crate::services::{RecordUpdate, WeightRecordStore};
use service_core::error::AppError;

fn record_store(state: &AppState, headers: &HeaderMap) -> Result<WeightRecordStore, AppError> {
    let session_id = require_session_id(headers)?;
    let role = state.auth.current_role(session_id)?;
    Ok(WeightRecordStore::new(state.backend.clone(), role))
}

/// List the logged-in role's records, optionally windowed.
///
/// GET /records?start=..&end=..
pub async fn list_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecordWindowQuery>,
) -> Result<Json<Vec<WeightRecord>>, AppError> {
    let store = record_store(&state, &headers)?;
    let records = store.get_records(query.start, query.end).await?;
    Ok(Json(records))
}

/// Add a record.
///
/// POST /records
pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<CreateRecordResponse>), AppError> {
    let store = record_store(&state, &headers)?;
    let id = store.add_record(req.timestamp, req.weight, req.note).await?;
    Ok((StatusCode::CREATED, Json(CreateRecordResponse { id })))
}

/// Edit a record.
///
/// PATCH /records/:id
pub async fn update_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let store = record_store(&state, &headers)?;
    store
        .update_record(
            id,
            RecordUpdate {
                timestamp: req.timestamp,
                weight: req.weight,
                note: req.note,
            },
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Record updated".to_string(),
    }))
}

/// Delete a record.
///
/// DELETE /records/:id
pub async fn delete_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let store = record_store(&state, &headers)?;
    store.delete_record(id).await?;
    Ok(Json(MessageResponse {
        message: "Record deleted".to_string(),
    }))
}
