//! Role-scoped CRUD over weight records.
//!
//! Each role's records live under `records/{role}` as a map of record id to
//! fields. The subtree is read and written whole; writes are conditional on
//! the version read, so concurrent edits to the same role's list surface as
//! `WriteConflict`.

use crate::db::{KvBackend, Version};
use crate::models::{Role, WeightRecord, record::sort_chronological};
use crate::services::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const MAX_NOTE_LEN: usize = 1024;

/// On-wire shape of one record; the id is the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    timestamp: DateTime<Utc>,
    weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

type RecordMap = BTreeMap<Uuid, StoredRecord>;

/// Partial update for an existing record. `None` fields are left unchanged.
#[derive(Debug, Default, Clone)]
pub struct RecordUpdate {
    pub timestamp: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct WeightRecordStore {
    backend: Arc<dyn KvBackend>,
    role: Role,
}

impl WeightRecordStore {
    pub fn new(backend: Arc<dyn KvBackend>, role: Role) -> Self {
        Self { backend, role }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    fn path(&self) -> String {
        format!("records/{}", self.role)
    }

    async fn load(&self) -> Result<(RecordMap, Version), ServiceError> {
        let (value, version) = self.backend.get(&self.path()).await?;
        let map = match value {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| anyhow::anyhow!("corrupt record list for {}: {}", self.role, e))?,
            None => RecordMap::new(),
        };
        Ok((map, version))
    }

    async fn store(&self, map: &RecordMap, version: &Version) -> Result<(), ServiceError> {
        let value = serde_json::to_value(map)
            .map_err(|e| anyhow::anyhow!("failed to encode record list: {}", e))?;
        let applied = self.backend.put(&self.path(), &value, Some(version)).await?;
        if !applied {
            return Err(ServiceError::WriteConflict);
        }
        Ok(())
    }

    /// Records ascending by `(timestamp, id)`. Without bounds the entire
    /// history is returned; with bounds, only records whose timestamp falls
    /// in the inclusive `[start, end]` window.
    pub async fn get_records(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<WeightRecord>, ServiceError> {
        let (map, _) = self.load().await?;
        let mut records: Vec<WeightRecord> = map
            .into_iter()
            .map(|(id, stored)| WeightRecord {
                id,
                timestamp: stored.timestamp,
                weight: stored.weight,
                note: stored.note,
            })
            .filter(|record| record.in_window(start, end))
            .collect();
        sort_chronological(&mut records);
        Ok(records)
    }

    pub async fn add_record(
        &self,
        timestamp: DateTime<Utc>,
        weight: f64,
        note: Option<String>,
    ) -> Result<Uuid, ServiceError> {
        validate_weight(weight)?;
        validate_note(note.as_deref())?;

        let (mut map, version) = self.load().await?;
        let id = Uuid::new_v4();
        map.insert(
            id,
            StoredRecord {
                timestamp,
                weight,
                note,
            },
        );
        self.store(&map, &version).await?;

        tracing::debug!(role = %self.role, record_id = %id, "Record added");
        Ok(id)
    }

    pub async fn update_record(
        &self,
        id: Uuid,
        update: RecordUpdate,
    ) -> Result<(), ServiceError> {
        if let Some(weight) = update.weight {
            validate_weight(weight)?;
        }
        validate_note(update.note.as_deref())?;

        let (mut map, version) = self.load().await?;
        let stored = map.get_mut(&id).ok_or(ServiceError::RecordNotFound)?;

        if let Some(timestamp) = update.timestamp {
            stored.timestamp = timestamp;
        }
        if let Some(weight) = update.weight {
            stored.weight = weight;
        }
        if let Some(note) = update.note {
            stored.note = Some(note);
        }

        self.store(&map, &version).await
    }

    /// Deleting an id that does not exist for this role fails with
    /// `RecordNotFound`; the rest of the list is never touched.
    pub async fn delete_record(&self, id: Uuid) -> Result<(), ServiceError> {
        let (mut map, version) = self.load().await?;
        if map.remove(&id).is_none() {
            return Err(ServiceError::RecordNotFound);
        }
        self.store(&map, &version).await?;

        tracing::debug!(role = %self.role, record_id = %id, "Record deleted");
        Ok(())
    }
}

fn validate_weight(weight: f64) -> Result<(), ServiceError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(ServiceError::Validation(format!(
            "weight must be a positive number, got {}",
            weight
        )));
    }
    Ok(())
}

fn validate_note(note: Option<&str>) -> Result<(), ServiceError> {
    if let Some(note) = note {
        if note.len() > MAX_NOTE_LEN {
            return Err(ServiceError::Validation(format!(
                "note exceeds {} bytes",
                MAX_NOTE_LEN
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use chrono::TimeZone;

    fn store() -> WeightRecordStore {
        WeightRecordStore::new(Arc::new(MemoryBackend::new()), Role::new("A"))
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_unbounded_returns_full_history_sorted() {
        let store = store();
        // Inserted out of order
        store.add_record(day(3), 69.0, None).await.unwrap();
        store.add_record(day(1), 70.0, None).await.unwrap();
        store.add_record(day(2), 69.5, None).await.unwrap();

        let records = store.get_records(None, None).await.unwrap();
        let weights: Vec<f64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![70.0, 69.5, 69.0]);
    }

    #[tokio::test]
    async fn test_bounded_window_is_inclusive() {
        let store = store();
        store.add_record(day(1), 70.0, None).await.unwrap();
        store.add_record(day(2), 69.5, None).await.unwrap();
        store.add_record(day(3), 69.0, None).await.unwrap();

        let records = store
            .get_records(Some(day(1)), Some(day(2)))
            .await
            .unwrap();
        let weights: Vec<f64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![70.0, 69.5]);
    }

    #[tokio::test]
    async fn test_update_record_partial_fields() {
        let store = store();
        let id = store
            .add_record(day(1), 70.0, Some("morning".to_string()))
            .await
            .unwrap();

        store
            .update_record(
                id,
                RecordUpdate {
                    weight: Some(69.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let records = store.get_records(None, None).await.unwrap();
        assert_eq!(records[0].weight, 69.0);
        assert_eq!(records[0].timestamp, day(1));
        assert_eq!(records[0].note.as_deref(), Some("morning"));
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let store = store();
        let err = store
            .update_record(Uuid::new_v4(), RecordUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RecordNotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_record_leaves_others_intact() {
        let store = store();
        store.add_record(day(1), 70.0, None).await.unwrap();

        let err = store.delete_record(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::RecordNotFound));
        assert_eq!(store.get_records(None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_record() {
        let store = store();
        let id = store.add_record(day(1), 70.0, None).await.unwrap();
        store.delete_record(id).await.unwrap();
        assert!(store.get_records(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_weight_rejected() {
        let store = store();
        for weight in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
            let err = store.add_record(day(1), weight, None).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
        assert!(store.get_records(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_note_rejected() {
        let store = store();
        let err = store
            .add_record(day(1), 70.0, Some("x".repeat(MAX_NOTE_LEN + 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_roles_are_isolated() {
        let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());
        let store_a = WeightRecordStore::new(backend.clone(), Role::new("A"));
        let store_b = WeightRecordStore::new(backend, Role::new("B"));

        store_a.add_record(day(1), 70.0, None).await.unwrap();
        assert!(store_b.get_records(None, None).await.unwrap().is_empty());
    }
}
