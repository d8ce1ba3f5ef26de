//! Per-post like state. A single global toggle and counter - no per-viewer
//! identity is tracked.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{LikeState, PostId};
use crate::engine::EngineInner;
use crate::engine::posts::{self, Posts};
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type LikeMap = HashMap<PostId, LikeState>;

pub struct LikeRegistry {
    inner: Arc<EngineInner>,
}

impl LikeRegistry {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    /// The `{count, liked}` state for a post; zero/false when never liked.
    pub async fn get(&self, post_id: PostId) -> Result<LikeState, EngineError> {
        let _guard = self.inner.lock(Collection::Likes).await;
        let likes: LikeMap = self.inner.load(Collection::Likes).await?;
        Ok(likes.get(&post_id).copied().unwrap_or_default())
    }

    /// Flip the like toggle and keep the post's denormalized `likes` field
    /// in sync. Applying twice restores both the registry and the mirror.
    pub async fn toggle(&self, post_id: PostId) -> Result<LikeState, EngineError> {
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _likes_guard = self.inner.lock(Collection::Likes).await;

        let mut likes: LikeMap = self.inner.load(Collection::Likes).await?;
        let state = likes.entry(post_id).or_default();
        *state = state.toggled();
        let toggled = *state;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        if posts::mirror_like_count(&mut posts, post_id, toggled.count) {
            self.inner
                .save_batch(vec![
                    (
                        Collection::Likes,
                        self.inner.encode(Collection::Likes, &likes)?,
                    ),
                    (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                ])
                .await?;
        } else {
            // Like state survives the post; keep it even with no mirror.
            self.inner.save(Collection::Likes, &likes).await?;
        }

        tracing::debug!(post_id = %post_id, count = toggled.count, liked = toggled.liked, "like toggled");
        Ok(toggled)
    }
}
