//! Comments - append-only, newest first, no edit or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{CommentId, PostId};

/// A stored comment. `post_id` is a plain foreign key; no referential
/// integrity is enforced against the posts collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    pub post_id: PostId,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied comment fields. Both are trimmed and must be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub name: String,
    pub content: String,
}
