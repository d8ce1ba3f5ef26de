//! In-memory store implementation - the default for tests and embedded
//! use without durability. Note: data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use vellum_core::ports::{Collection, StateStore, StoreError};

/// Whole-collection store backed by a HashMap behind an async RwLock.
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn load(&self, collection: Collection) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned())
    }

    async fn save(&self, collection: Collection, value: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections.insert(collection, value);
        Ok(())
    }

    async fn save_all(&self, entries: Vec<(Collection, Value)>) -> Result<(), StoreError> {
        // One write lock spans the batch, so the whole move lands at once.
        let mut collections = self.collections.write().await;
        for (collection, value) in entries {
            collections.insert(collection, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryStore::new();
        store
            .save(Collection::Posts, json!([{"id": 1}]))
            .await
            .unwrap();
        let loaded = store.load(Collection::Posts).await.unwrap();
        assert_eq!(loaded, Some(json!([{"id": 1}])));
    }

    #[tokio::test]
    async fn test_unsaved_collection_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.load(Collection::Drafts).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_all_lands_every_entry() {
        let store = InMemoryStore::new();
        store
            .save_all(vec![
                (Collection::Posts, json!([])),
                (Collection::Scheduled, json!([1, 2])),
            ])
            .await
            .unwrap();
        assert_eq!(store.load(Collection::Posts).await.unwrap(), Some(json!([])));
        assert_eq!(
            store.load(Collection::Scheduled).await.unwrap(),
            Some(json!([1, 2]))
        );
    }
}
