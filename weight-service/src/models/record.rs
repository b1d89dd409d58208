//! Weight record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single weight measurement owned by one role.
///
/// Timestamps are not required to be monotonic - records may be entered out
/// of order and are sorted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeightRecord {
    pub fn new(timestamp: DateTime<Utc>, weight: f64, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            weight,
            note,
        }
    }

    /// Whether the record falls inside the inclusive `[start, end]` window.
    /// A missing bound is open on that side.
    pub fn in_window(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
        if let Some(start) = start {
            if self.timestamp < start {
                return false;
            }
        }
        if let Some(end) = end {
            if self.timestamp > end {
                return false;
            }
        }
        true
    }
}

/// Sort ascending by timestamp, tie-broken by id so the order is
/// deterministic for records sharing a timestamp.
pub fn sort_chronological(records: &mut [WeightRecord]) {
    records.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(ts: DateTime<Utc>, weight: f64) -> WeightRecord {
        WeightRecord::new(ts, weight, None)
    }

    #[test]
    fn test_sort_is_ascending_by_timestamp() {
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap();
        let mut records = vec![
            record_at(day(3), 69.0),
            record_at(day(1), 70.0),
            record_at(day(2), 69.5),
        ];
        sort_chronological(&mut records);

        let weights: Vec<f64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![70.0, 69.5, 69.0]);
    }

    #[test]
    fn test_sort_tie_break_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut records = vec![record_at(ts, 70.0), record_at(ts, 71.0), record_at(ts, 72.0)];

        let mut expected = records.clone();
        expected.sort_by_key(|r| r.id);

        // Shuffled input converges to the same order
        records.reverse();
        sort_chronological(&mut records);
        assert_eq!(records, expected);
    }

    #[test]
    fn test_in_window_bounds_are_inclusive() {
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap();
        let record = record_at(day(2), 70.0);

        assert!(record.in_window(Some(day(2)), Some(day(2))));
        assert!(record.in_window(Some(day(1)), Some(day(3))));
        assert!(record.in_window(None, None));
        assert!(!record.in_window(Some(day(3)), None));
        assert!(!record.in_window(None, Some(day(1))));
    }
}
