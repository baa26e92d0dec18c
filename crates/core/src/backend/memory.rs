//! In-memory document store.
//!
//! Backs tests (including as a call-counting spy) and offline use. Mirrors
//! the real store's observable semantics: per-identifier uniqueness, field
//! merge on update, matched/deleted counts.

use crate::backend::{BackendError, DocumentStore};
use crate::record::Fields;
use crate::record_id::RecordId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

type Collections = HashMap<String, HashMap<RecordId, Fields>>;

/// A process-local document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far (ping and close
    /// included). Lets tests assert that a code path made zero store calls.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of documents currently held in `collection`.
    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map(|guard| guard.get(collection).map_or(0, HashMap::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Collections>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.collections.lock().map_err(|_| BackendError::Poisoned)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<Fields>, BackendError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<(), BackendError> {
        let mut guard = self.lock()?;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(*id, fields.clone());
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<u64, BackendError> {
        let mut guard = self.lock()?;
        match guard.get_mut(collection).and_then(|records| records.get_mut(id)) {
            Some(existing) => {
                for (name, value) in fields {
                    existing.insert(name.clone(), value.clone());
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, collection: &str, id: &RecordId) -> Result<u64, BackendError> {
        let mut guard = self.lock()?;
        match guard.get_mut(collection).and_then(|records| records.remove(id)) {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.lock()?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_then_find_round_trips() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        let attrs = fields(&[("Age", FieldValue::Int(54))]);

        store
            .insert_one("Patients", &id, &attrs)
            .await
            .expect("insert should succeed");

        let found = store
            .find_one("Patients", &id)
            .await
            .expect("find should succeed");
        assert_eq!(found, Some(attrs));
    }

    #[tokio::test]
    async fn test_update_merges_listed_fields_only() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        store
            .insert_one(
                "Patients",
                &id,
                &fields(&[
                    ("Age", FieldValue::Int(54)),
                    ("BP", FieldValue::Int(130)),
                ]),
            )
            .await
            .expect("insert should succeed");

        let matched = store
            .update_one("Patients", &id, &fields(&[("Age", FieldValue::Int(55))]))
            .await
            .expect("update should succeed");
        assert_eq!(matched, 1);

        let found = store
            .find_one("Patients", &id)
            .await
            .expect("find should succeed")
            .expect("record should still exist");
        assert_eq!(found.get("Age"), Some(&FieldValue::Int(55)));
        assert_eq!(found.get("BP"), Some(&FieldValue::Int(130)));
    }

    #[tokio::test]
    async fn test_update_unknown_id_matches_nothing() {
        let store = MemoryStore::new();

        let matched = store
            .update_one(
                "Patients",
                &RecordId::generate(),
                &fields(&[("Age", FieldValue::Int(55))]),
            )
            .await
            .expect("update should succeed");
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_delete_reports_deleted_count() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        store
            .insert_one("Patients", &id, &Fields::new())
            .await
            .expect("insert should succeed");

        assert_eq!(store.delete_one("Patients", &id).await.unwrap(), 1);
        assert_eq!(store.delete_one("Patients", &id).await.unwrap(), 0);
        assert_eq!(store.record_count("Patients"), 0);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        let id = RecordId::generate();
        store
            .insert_one("Patients", &id, &Fields::new())
            .await
            .expect("insert should succeed");

        let found = store
            .find_one("Controls", &id)
            .await
            .expect("find should succeed");
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_call_count_tracks_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.call_count(), 0);

        store.ping().await.expect("ping should succeed");
        store
            .find_one("Patients", &RecordId::generate())
            .await
            .expect("find should succeed");

        assert_eq!(store.call_count(), 2);
    }
}
