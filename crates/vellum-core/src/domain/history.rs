//! History snapshots - immutable captures of a post taken immediately
//! before each overwrite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::content::PostRecord;
use crate::domain::ids::HistoryId;

/// Retention per post. Inserting beyond this evicts the oldest snapshot.
pub const HISTORY_CAPACITY: usize = 20;

/// One snapshot in a post's history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub history_id: HistoryId,
    pub saved_at: DateTime<Utc>,
    pub snapshot: PostRecord,
}

/// Side-by-side view of the live post against one historical snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDiff {
    pub current: VersionView,
    pub historical: VersionView,
}

/// One side of a [`HistoryDiff`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionView {
    pub title: String,
    pub content: String,
    pub version: u32,
    /// `updated_at` for the live post, `saved_at` for the snapshot.
    pub captured_at: DateTime<Utc>,
}

impl VersionView {
    pub fn of_current(post: &PostRecord) -> Self {
        Self {
            title: post.body.title.clone(),
            content: post.body.content.clone(),
            version: post.version,
            captured_at: post.updated_at,
        }
    }

    pub fn of_entry(entry: &HistoryEntry) -> Self {
        Self {
            title: entry.snapshot.body.title.clone(),
            content: entry.snapshot.body.content.clone(),
            version: entry.snapshot.version,
            captured_at: entry.saved_at,
        }
    }
}
