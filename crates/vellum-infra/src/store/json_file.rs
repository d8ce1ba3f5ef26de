//! JSON-file store - one `<collection>.json` per collection under a single
//! directory. Writes go through a temp file and rename, so a crashed write
//! never leaves a half-written collection behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use vellum_core::ports::{Collection, StateStore, StoreError};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    fn tmp_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", collection.name()))
    }

    async fn stage(&self, collection: Collection, value: &Value) -> Result<PathBuf, StoreError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|err| StoreError::Encode {
            collection,
            detail: err.to_string(),
        })?;
        let tmp = self.tmp_path(collection);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|err| io_error(collection, &tmp, err))?;
        Ok(tmp)
    }

    async fn commit(&self, collection: Collection, tmp: &Path) -> Result<(), StoreError> {
        let path = self.path(collection);
        tokio::fs::rename(tmp, &path)
            .await
            .map_err(|err| io_error(collection, &path, err))
    }
}

fn io_error(collection: Collection, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        collection,
        detail: format!("{}: {err}", path.display()),
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, collection: Collection) -> Result<Option<Value>, StoreError> {
        let path = self.path(collection);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|err| StoreError::Corrupt {
                    collection,
                    detail: err.to_string(),
                }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(collection, &path, err)),
        }
    }

    async fn save(&self, collection: Collection, value: Value) -> Result<(), StoreError> {
        let tmp = self.stage(collection, &value).await?;
        self.commit(collection, &tmp).await
    }

    async fn save_all(&self, entries: Vec<(Collection, Value)>) -> Result<(), StoreError> {
        // Stage every file first, then rename. Each rename is atomic; any
        // staging failure aborts before a single collection has changed.
        let mut staged = Vec::with_capacity(entries.len());
        for (collection, value) in &entries {
            staged.push((*collection, self.stage(*collection, value).await?));
        }
        for (collection, tmp) in staged {
            self.commit(collection, &tmp).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        store
            .save(Collection::Posts, json!([{"title": "t"}]))
            .await
            .unwrap();
        let loaded = store.load(Collection::Posts).await.unwrap();
        assert_eq!(loaded, Some(json!([{"title": "t"}])));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.load(Collection::History).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_garbage_on_disk_is_corrupt_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        tokio::fs::write(dir.path().join("posts.json"), b"{not json")
            .await
            .unwrap();
        let result = store.load(Collection::Posts).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_save_all_writes_every_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        store
            .save_all(vec![
                (Collection::Posts, json!([1])),
                (Collection::Scheduled, json!([])),
            ])
            .await
            .unwrap();
        assert_eq!(store.load(Collection::Posts).await.unwrap(), Some(json!([1])));
        assert_eq!(
            store.load(Collection::Scheduled).await.unwrap(),
            Some(json!([]))
        );
        assert!(!dir.path().join("posts.json.tmp").exists());
    }
}
