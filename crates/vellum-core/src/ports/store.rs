//! Storage port - whole-collection persistence.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// The six named collections the engine persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Drafts,
    Scheduled,
    Comments,
    Likes,
    History,
}

impl Collection {
    /// All collections, in lock-acquisition order (see the engine).
    pub const ALL: [Collection; 6] = [
        Collection::Posts,
        Collection::Drafts,
        Collection::Scheduled,
        Collection::Comments,
        Collection::Likes,
        Collection::History,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Drafts => "drafts",
            Collection::Scheduled => "scheduled",
            Collection::Comments => "comments",
            Collection::Likes => "likes",
            Collection::History => "history",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failure on {collection}: {detail}")]
    Io {
        collection: Collection,
        detail: String,
    },

    #[error("Stored {collection} collection is not valid JSON: {detail}")]
    Corrupt {
        collection: Collection,
        detail: String,
    },

    #[error("Failed to encode {collection} for storage: {detail}")]
    Encode {
        collection: Collection,
        detail: String,
    },
}

/// Whole-collection storage.
///
/// A collection is loaded and saved as one unit; there are no partial reads
/// or writes and no migration. Malformed stored data must surface as
/// [`StoreError::Corrupt`], never silently reset to empty.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load a collection. `None` means it has never been saved.
    async fn load(&self, collection: Collection) -> Result<Option<Value>, StoreError>;

    /// Replace a collection in one atomic write.
    async fn save(&self, collection: Collection, value: Value) -> Result<(), StoreError>;

    /// Replace several collections as a single batch. Cross-collection
    /// moves (publish, sweep, to-draft) persist through this so one side
    /// cannot land without the other.
    async fn save_all(&self, entries: Vec<(Collection, Value)>) -> Result<(), StoreError>;
}
