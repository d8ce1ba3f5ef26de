//! Unpublished working copies. CRUD without versioning or history, plus the
//! one-way publish transition into the posts collection.

use std::sync::Arc;

use crate::domain::{ContentBody, ContentPatch, DraftId, DraftRecord, PostId, PostRecord};
use crate::engine::EngineInner;
use crate::engine::posts::Posts;
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type Drafts = Vec<DraftRecord>;

pub struct DraftRepository {
    inner: Arc<EngineInner>,
}

impl DraftRepository {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Result<Vec<DraftRecord>, EngineError> {
        let _guard = self.inner.lock(Collection::Drafts).await;
        self.inner.load(Collection::Drafts).await
    }

    pub async fn get_by_id(&self, id: DraftId) -> Result<Option<DraftRecord>, EngineError> {
        let drafts = self.list().await?;
        Ok(drafts.into_iter().find(|draft| draft.id == id))
    }

    pub async fn create(&self, body: ContentBody) -> Result<DraftRecord, EngineError> {
        self.inner.check_mutate()?;
        let _guard = self.inner.lock(Collection::Drafts).await;

        let mut drafts: Drafts = self.inner.load(Collection::Drafts).await?;
        let record = DraftRecord::new(DraftId::new(), body, self.inner.now());
        drafts.insert(0, record.clone());
        self.inner.save(Collection::Drafts, &drafts).await?;

        tracing::debug!(draft_id = %record.id, "draft created");
        Ok(record)
    }

    pub async fn update(
        &self,
        id: DraftId,
        patch: ContentPatch,
    ) -> Result<DraftRecord, EngineError> {
        self.inner.check_mutate()?;
        let _guard = self.inner.lock(Collection::Drafts).await;

        let mut drafts: Drafts = self.inner.load(Collection::Drafts).await?;
        let record = drafts
            .iter_mut()
            .find(|draft| draft.id == id)
            .ok_or(EngineError::NotFound {
                entity: "draft",
                id: id.as_uuid(),
            })?;

        record.body.apply(patch)?;
        record.updated_at = self.inner.now();
        let updated = record.clone();
        self.inner.save(Collection::Drafts, &drafts).await?;
        Ok(updated)
    }

    /// Deleting an absent id is a no-op.
    pub async fn delete(&self, id: DraftId) -> Result<(), EngineError> {
        self.inner.check_delete()?;
        let _guard = self.inner.lock(Collection::Drafts).await;

        let mut drafts: Drafts = self.inner.load(Collection::Drafts).await?;
        let before = drafts.len();
        drafts.retain(|draft| draft.id != id);
        if drafts.len() != before {
            self.inner.save(Collection::Drafts, &drafts).await?;
        }
        Ok(())
    }

    /// Move a draft into the posts collection under a brand-new post
    /// identity; the draft id is never reused, which severs the draft/post
    /// relationship permanently. Both collections persist in one batch.
    pub async fn publish(&self, id: DraftId) -> Result<PostRecord, EngineError> {
        self.inner.check_mutate()?;
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _drafts_guard = self.inner.lock(Collection::Drafts).await;

        let mut drafts: Drafts = self.inner.load(Collection::Drafts).await?;
        let position = drafts
            .iter()
            .position(|draft| draft.id == id)
            .ok_or(EngineError::NotFound {
                entity: "draft",
                id: id.as_uuid(),
            })?;
        let draft = drafts.remove(position);

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let post = PostRecord::published(PostId::new(), draft.body, self.inner.now());
        posts.insert(0, post.clone());

        self.inner
            .save_batch(vec![
                (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                (
                    Collection::Drafts,
                    self.inner.encode(Collection::Drafts, &drafts)?,
                ),
            ])
            .await?;

        tracing::info!(draft_id = %id, post_id = %post.id, "draft published");
        Ok(post)
    }
}
