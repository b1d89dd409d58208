use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub timestamp: DateTime<Utc>,
    pub weight: f64,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRecordResponse {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub timestamp: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub note: Option<String>,
}

/// Inclusive `[start, end]` window; a missing bound is open on that side.
#[derive(Debug, Default, Deserialize)]
pub struct RecordWindowQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}
