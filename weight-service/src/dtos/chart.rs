use crate::models::{Role, WeightRecord};
use crate::services::Trend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Fit a least-squares trend per role for extrapolated future points.
    #[serde(default)]
    pub predict: bool,
}

/// One role's display series: windowed records plus the optional trend
/// fitted on the role's full history.
#[derive(Debug, Serialize)]
pub struct RoleSeries {
    pub role: Role,
    pub records: Vec<WeightRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub series: Vec<RoleSeries>,
}
