//! Append-only comment log per post, newest first.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{CommentId, CommentRecord, NewComment, PostId};
use crate::engine::EngineInner;
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type CommentMap = HashMap<PostId, Vec<CommentRecord>>;

pub struct CommentLog {
    inner: Arc<EngineInner>,
}

impl CommentLog {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    /// Comments for one post, newest first. Re-reads the store on every
    /// call.
    pub async fn list(&self, post_id: PostId) -> Result<Vec<CommentRecord>, EngineError> {
        let _guard = self.inner.lock(Collection::Comments).await;
        let mut comments: CommentMap = self.inner.load(Collection::Comments).await?;
        Ok(comments.remove(&post_id).unwrap_or_default())
    }

    /// Prepend a comment. Name and content are trimmed and must be
    /// non-empty; there is no edit or delete operation.
    pub async fn add(
        &self,
        post_id: PostId,
        comment: NewComment,
    ) -> Result<CommentRecord, EngineError> {
        let name = comment.name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "comment name must not be empty".into(),
            ));
        }
        let content = comment.content.trim();
        if content.is_empty() {
            return Err(EngineError::Validation(
                "comment content must not be empty".into(),
            ));
        }

        let _guard = self.inner.lock(Collection::Comments).await;
        let mut comments: CommentMap = self.inner.load(Collection::Comments).await?;

        let record = CommentRecord {
            id: CommentId::new(),
            post_id,
            name: name.to_string(),
            content: content.to_string(),
            created_at: self.inner.now(),
        };
        comments.entry(post_id).or_default().insert(0, record.clone());
        self.inner.save(Collection::Comments, &comments).await?;

        tracing::debug!(post_id = %post_id, comment_id = %record.id, "comment added");
        Ok(record)
    }
}
