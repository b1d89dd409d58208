//! Joint chart data: both roles' series for the active window, with an
//! optional trend line per role.

use axum::{
    extract::{Json, Query, State},
    http::HeaderMap,
};

use crate::AppState;
use crate::dtos::chart::{ChartQuery, ChartResponse, RoleSeries};
use crate::handlers::require_session_id;
use crate::services::{WeightRecordStore, filter_range, fit_trend};
use service_core::error::AppError;

/// Chart data for both roles. Any logged-in session may view both series;
/// only the editable record list is restricted to the session's own role.
///
/// GET /chart?start=..&end=..&predict=bool
pub async fn chart_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let session_id = require_session_id(&headers)?;
    state.auth.current_role(session_id)?;

    let mut series = Vec::with_capacity(2);
    for role in state.auth.valid_roles() {
        let store = WeightRecordStore::new(state.backend.clone(), role.clone());
        // Full history: the trend must not move when the window changes
        let history = store.get_records(None, None).await?;

        let trend = if query.predict {
            fit_trend(&history)
        } else {
            None
        };

        series.push(RoleSeries {
            role: role.clone(),
            records: filter_range(&history, query.start, query.end),
            trend,
        });
    }

    Ok(Json(ChartResponse { series }))
}
