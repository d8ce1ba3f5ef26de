//! Content records - the shared authored shape and its three lifecycle
//! states. Each state lives in its own collection; `status` is a display
//! tag, never the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{DraftId, HistoryId, PostId, ScheduledId};
use crate::error::EngineError;

/// Lifecycle state of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Scheduled,
    Published,
}

/// The author-editable fields shared by drafts, scheduled entries and
/// published posts. `content` is an opaque rich-text blob; the engine never
/// parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBody {
    pub title: String,
    pub content: String,
    pub category: String,
    /// Set semantics with insertion order preserved for display.
    pub tags: Vec<String>,
    pub author: String,
}

impl ContentBody {
    /// Build a validated body. The title must be non-empty after trimming;
    /// tags are deduplicated keeping the first occurrence.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
        author: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EngineError::Validation("title must not be empty".into()));
        }
        Ok(Self {
            title,
            content: content.into(),
            category: category.into(),
            tags: dedup_tags(tags),
            author: author.into(),
        })
    }

    /// Apply a patch field by field. Only fields present in the patch
    /// change; a patched title is re-validated.
    pub fn apply(&mut self, patch: ContentPatch) -> Result<(), EngineError> {
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(EngineError::Validation("title must not be empty".into()));
            }
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        Ok(())
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// A partial update of the authored fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

/// A published post. Counters and version are adjusted only by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: PostId,
    #[serde(flatten)]
    pub body: ContentBody,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_from: Option<HistoryId>,
}

impl PostRecord {
    /// A freshly published record at version 1 with zeroed counters.
    pub fn published(id: PostId, body: ContentBody, now: DateTime<Utc>) -> Self {
        Self {
            id,
            body,
            status: ContentStatus::Published,
            created_at: now,
            updated_at: now,
            published_at: now,
            views: 0,
            likes: 0,
            version: 1,
            restored_from: None,
        }
    }
}

/// An unpublished working copy. Mutable scratch space: no versioning, no
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub id: DraftId,
    #[serde(flatten)]
    pub body: ContentBody,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftRecord {
    pub fn new(id: DraftId, body: ContentBody, now: DateTime<Utc>) -> Self {
        Self {
            id,
            body,
            status: ContentStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Content pending time-triggered publication. `scheduled_time` is strictly
/// in the future at creation/update time; the sweep consumes the entry once
/// it is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRecord {
    pub id: ScheduledId,
    #[serde(flatten)]
    pub body: ContentBody,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub scheduled_time: DateTime<Utc>,
}

impl ScheduledRecord {
    pub fn new(
        id: ScheduledId,
        body: ContentBody,
        scheduled_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            body,
            status: ContentStatus::Scheduled,
            created_at: now,
            updated_at: now,
            scheduled_time,
        }
    }
}
