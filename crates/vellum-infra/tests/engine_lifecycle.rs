//! Lifecycle behavior tests for the engine over the in-memory store, with
//! an injected clock so schedule validation and the sweep are
//! deterministic.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use vellum_core::domain::{ContentBody, ContentPatch, ContentStatus, NewComment};
use vellum_core::ports::{AccessGate, AllowAll, Clock, Collection, FixedClock, StateStore};
use vellum_core::{Engine, EngineError};
use vellum_infra::InMemoryStore;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn body(title: &str) -> ContentBody {
    ContentBody::new(title, "some text", "essays", vec!["zen".into()], "ada").unwrap()
}

fn title_patch(title: &str) -> ContentPatch {
    ContentPatch {
        title: Some(title.into()),
        ..Default::default()
    }
}

fn content_patch(content: &str) -> ContentPatch {
    ContentPatch {
        content: Some(content.into()),
        ..Default::default()
    }
}

fn engine() -> (Engine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::at(start_time()));
    let engine = Engine::with_parts(
        Arc::new(InMemoryStore::new()),
        clock.clone(),
        Arc::new(AllowAll),
    );
    (engine, clock)
}

#[tokio::test]
async fn update_bumps_version_and_snapshots_pre_patch_state() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("First")).await.unwrap();
    assert_eq!(post.version, 1);

    let updated = engine
        .posts()
        .update(post.id, title_patch("Second"))
        .await
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.body.title, "Second");

    let history = engine.history().list(post.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].snapshot, post);
}

#[tokio::test]
async fn update_of_absent_post_is_not_found() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("First")).await.unwrap();
    engine.posts().delete(post.id).await.unwrap();

    let result = engine.posts().update(post.id, title_patch("x")).await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn history_caps_at_twenty_evicting_oldest() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("v1")).await.unwrap();

    for i in 2..=22 {
        engine
            .posts()
            .update(post.id, title_patch(&format!("v{i}")))
            .await
            .unwrap();
    }

    // 21 updates produced 21 snapshots; the version-1 snapshot fell off.
    let history = engine.history().list(post.id).await.unwrap();
    assert_eq!(history.len(), 20);
    let versions: Vec<u32> = history.iter().map(|e| e.snapshot.version).collect();
    let expected: Vec<u32> = (2..=21).rev().collect();
    assert_eq!(versions, expected);
}

#[tokio::test]
async fn publish_draft_severs_identity_and_zeroes_counters() {
    let (engine, _) = engine();
    let draft = engine.drafts().create(body("Draft")).await.unwrap();

    let post = engine.drafts().publish(draft.id).await.unwrap();
    assert_eq!(post.status, ContentStatus::Published);
    assert_eq!(post.views, 0);
    assert_eq!(post.likes, 0);
    assert_eq!(post.version, 1);
    assert_ne!(post.id.as_uuid(), draft.id.as_uuid());

    assert!(engine.drafts().list().await.unwrap().is_empty());
    assert_eq!(engine.posts().list().await.unwrap().len(), 1);

    // No prior post existed, so publishing produced no history entry.
    assert!(engine.history().list(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn publish_of_absent_draft_is_not_found() {
    let (engine, _) = engine();
    let draft = engine.drafts().create(body("Draft")).await.unwrap();
    engine.drafts().delete(draft.id).await.unwrap();

    let result = engine.drafts().publish(draft.id).await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn schedule_requires_strictly_future_time() {
    let (engine, clock) = engine();

    let past = clock.now() - Duration::seconds(1);
    let result = engine.scheduled().create(body("Late"), past).await;
    assert!(matches!(
        result,
        Err(EngineError::InvalidScheduleTime { .. })
    ));

    // Exactly now is not "strictly in the future" either.
    let result = engine.scheduled().create(body("Now"), clock.now()).await;
    assert!(matches!(
        result,
        Err(EngineError::InvalidScheduleTime { .. })
    ));

    let future = clock.now() + Duration::hours(1);
    let entry = engine.scheduled().create(body("Soon"), future).await.unwrap();
    assert_eq!(entry.scheduled_time, future);
    assert_eq!(engine.scheduled().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn reschedule_to_past_is_rejected() {
    let (engine, clock) = engine();
    let entry = engine
        .scheduled()
        .create(body("Soon"), clock.now() + Duration::hours(1))
        .await
        .unwrap();

    let result = engine
        .scheduled()
        .update(
            entry.id,
            ContentPatch::default(),
            Some(clock.now() - Duration::hours(1)),
        )
        .await;
    assert!(matches!(
        result,
        Err(EngineError::InvalidScheduleTime { .. })
    ));
}

#[tokio::test]
async fn sweep_publishes_due_entries_exactly_once() {
    let (engine, clock) = engine();
    let due = engine
        .scheduled()
        .create(body("Due"), clock.now() + Duration::hours(1))
        .await
        .unwrap();
    engine
        .scheduled()
        .create(body("Later"), clock.now() + Duration::days(7))
        .await
        .unwrap();

    let published = engine
        .scheduled()
        .sweep(clock.now() + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(published, 1);

    let posts = engine.posts().list().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].body.title, "Due");
    assert_ne!(posts[0].id.as_uuid(), due.id.as_uuid());

    let remaining = engine.scheduled().list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].body.title, "Later");

    // A second overlapping window publishes nothing new.
    let published = engine
        .scheduled()
        .sweep(clock.now() + Duration::hours(3))
        .await
        .unwrap();
    assert_eq!(published, 0);
    assert_eq!(engine.posts().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sweep_with_nothing_due_publishes_zero() {
    let (engine, clock) = engine();
    engine
        .scheduled()
        .create(body("Later"), clock.now() + Duration::days(1))
        .await
        .unwrap();

    assert_eq!(engine.scheduled().sweep(clock.now()).await.unwrap(), 0);
    assert!(engine.posts().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn publish_now_ignores_scheduled_time() {
    let (engine, clock) = engine();
    let entry = engine
        .scheduled()
        .create(body("Eventually"), clock.now() + Duration::days(30))
        .await
        .unwrap();

    clock.advance(Duration::minutes(5));
    let post = engine.scheduled().publish_now(entry.id).await.unwrap();
    assert_eq!(post.published_at, clock.now());
    assert!(engine.scheduled().list().await.unwrap().is_empty());
    assert_eq!(engine.posts().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn to_draft_drops_scheduled_time_and_keeps_content() {
    let (engine, clock) = engine();
    let entry = engine
        .scheduled()
        .create(body("Parked"), clock.now() + Duration::hours(6))
        .await
        .unwrap();

    let draft = engine.scheduled().to_draft(entry.id).await.unwrap();
    assert_eq!(draft.body, entry.body);
    assert_eq!(draft.status, ContentStatus::Draft);
    assert_ne!(draft.id.as_uuid(), entry.id.as_uuid());

    assert!(engine.scheduled().list().await.unwrap().is_empty());
    assert_eq!(engine.drafts().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn like_toggle_is_an_involution_and_mirrors_the_post() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("Liked")).await.unwrap();

    let state = engine.likes().toggle(post.id).await.unwrap();
    assert_eq!(state.count, 1);
    assert!(state.liked);
    let mirrored = engine.posts().get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(mirrored.likes, 1);

    let state = engine.likes().toggle(post.id).await.unwrap();
    assert_eq!(state.count, 0);
    assert!(!state.liked);
    let mirrored = engine.posts().get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(mirrored.likes, 0);
    assert_eq!(engine.likes().get(post.id).await.unwrap(), state);
}

#[tokio::test]
async fn increment_views_counts_every_call() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("Read")).await.unwrap();

    engine.posts().increment_views(post.id).await.unwrap();
    engine.posts().increment_views(post.id).await.unwrap();
    let read = engine.posts().get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(read.views, 2);

    // Absent id is a silent no-op.
    engine.posts().delete(post.id).await.unwrap();
    engine.posts().increment_views(post.id).await.unwrap();
}

#[tokio::test]
async fn restore_scenario_matches_the_version_ladder() {
    let (engine, _) = engine();

    // v1 -> edit title (v2) -> edit content (v3).
    let post = engine.posts().create(body("Original")).await.unwrap();
    engine
        .posts()
        .update(post.id, title_patch("Retitled"))
        .await
        .unwrap();
    engine
        .posts()
        .update(post.id, content_patch("rewritten"))
        .await
        .unwrap();

    let history = engine.history().list(post.id).await.unwrap();
    let versions: Vec<u32> = history.iter().map(|e| e.snapshot.version).collect();
    assert_eq!(versions, vec![2, 1]);

    // Restore the v1 snapshot: authored fields revert, version keeps
    // climbing, and the pre-restore v3 state becomes the newest snapshot.
    let v1_entry = history.last().unwrap();
    let restored = engine
        .history()
        .restore(post.id, v1_entry.history_id)
        .await
        .unwrap();
    assert_eq!(restored.version, 4);
    assert_eq!(restored.body.title, "Original");
    assert_eq!(restored.body.content, "some text");
    assert_eq!(restored.restored_from, Some(v1_entry.history_id));

    let history = engine.history().list(post.id).await.unwrap();
    let versions: Vec<u32> = history.iter().map(|e| e.snapshot.version).collect();
    assert_eq!(versions, vec![3, 2, 1]);
}

#[tokio::test]
async fn restore_does_not_revert_counters_or_created_at() {
    let (engine, clock) = engine();
    let post = engine.posts().create(body("Original")).await.unwrap();
    engine.posts().increment_views(post.id).await.unwrap();
    engine.likes().toggle(post.id).await.unwrap();

    clock.advance(Duration::minutes(1));
    engine
        .posts()
        .update(post.id, title_patch("Retitled"))
        .await
        .unwrap();

    let entry = engine.history().list(post.id).await.unwrap()[0].clone();
    let restored = engine.history().restore(post.id, entry.history_id).await.unwrap();
    assert_eq!(restored.views, 1);
    assert_eq!(restored.likes, 1);
    assert_eq!(restored.created_at, post.created_at);
    assert_eq!(restored.updated_at, clock.now());
}

#[tokio::test]
async fn restore_with_unknown_history_id_is_not_found() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("Original")).await.unwrap();

    let other = engine.posts().create(body("Other")).await.unwrap();
    engine
        .posts()
        .update(other.id, title_patch("Changed"))
        .await
        .unwrap();
    let foreign_entry = engine.history().list(other.id).await.unwrap()[0].clone();

    // The entry exists, but not in this post's log.
    let result = engine.history().restore(post.id, foreign_entry.history_id).await;
    assert!(matches!(result, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn delete_leaves_history_comments_and_likes_in_place() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("Doomed")).await.unwrap();
    engine
        .posts()
        .update(post.id, title_patch("Edited"))
        .await
        .unwrap();
    engine
        .comments()
        .add(
            post.id,
            NewComment {
                name: "reader".into(),
                content: "nice".into(),
            },
        )
        .await
        .unwrap();
    engine.likes().toggle(post.id).await.unwrap();

    engine.posts().delete(post.id).await.unwrap();
    assert!(engine.posts().get_by_id(post.id).await.unwrap().is_none());

    // Audit trail and reader state survive the delete.
    assert_eq!(engine.history().list(post.id).await.unwrap().len(), 1);
    assert_eq!(engine.comments().list(post.id).await.unwrap().len(), 1);
    assert_eq!(engine.likes().get(post.id).await.unwrap().count, 1);

    // Explicit opt-in cleanup.
    engine.history().clear(post.id).await.unwrap();
    assert!(engine.history().list(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn comments_are_validated_and_newest_first() {
    let (engine, clock) = engine();
    let post = engine.posts().create(body("Discussed")).await.unwrap();

    let result = engine
        .comments()
        .add(
            post.id,
            NewComment {
                name: "   ".into(),
                content: "text".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let result = engine
        .comments()
        .add(
            post.id,
            NewComment {
                name: "reader".into(),
                content: "".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    engine
        .comments()
        .add(
            post.id,
            NewComment {
                name: "reader".into(),
                content: "first".into(),
            },
        )
        .await
        .unwrap();
    clock.advance(Duration::seconds(30));
    engine
        .comments()
        .add(
            post.id,
            NewComment {
                name: " reader ".into(),
                content: " second ".into(),
            },
        )
        .await
        .unwrap();

    let comments = engine.comments().list(post.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content, "second");
    assert_eq!(comments[0].name, "reader");
    assert_eq!(comments[1].content, "first");
}

#[tokio::test]
async fn history_diff_compares_live_post_with_snapshot() {
    let (engine, _) = engine();
    let post = engine.posts().create(body("Original")).await.unwrap();
    engine
        .posts()
        .update(post.id, title_patch("Retitled"))
        .await
        .unwrap();

    let entry = engine.history().list(post.id).await.unwrap()[0].clone();
    let diff = engine
        .history()
        .diff(post.id, entry.history_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(diff.current.title, "Retitled");
    assert_eq!(diff.current.version, 2);
    assert_eq!(diff.historical.title, "Original");
    assert_eq!(diff.historical.version, 1);

    engine.posts().delete(post.id).await.unwrap();
    let diff = engine.history().diff(post.id, entry.history_id).await.unwrap();
    assert!(diff.is_none());
}

#[tokio::test]
async fn corrupt_stored_collection_is_refused_not_reset() {
    let store = Arc::new(InMemoryStore::new());
    store
        .save(Collection::Posts, serde_json::json!({"not": "an array"}))
        .await
        .unwrap();

    let engine = Engine::new(store);
    let result = engine.posts().list().await;
    assert!(matches!(result, Err(EngineError::CorruptState { .. })));
}

struct ReadOnlyGate;

impl AccessGate for ReadOnlyGate {
    fn can_mutate(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn denied_gate_rejects_authoring_but_not_reader_actions() {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::at(start_time()));

    // Seed one post while mutation is allowed.
    let open = Engine::with_parts(store.clone(), clock.clone(), Arc::new(AllowAll));
    let post = open.posts().create(body("Sealed")).await.unwrap();

    let sealed = Engine::with_parts(store, clock, Arc::new(ReadOnlyGate));
    let result = sealed.posts().create(body("Blocked")).await;
    assert!(matches!(result, Err(EngineError::Unauthorized)));
    let result = sealed.posts().update(post.id, title_patch("Blocked")).await;
    assert!(matches!(result, Err(EngineError::Unauthorized)));
    let result = sealed.posts().delete(post.id).await;
    assert!(matches!(result, Err(EngineError::Unauthorized)));

    // Reader-side interactions stay open.
    sealed.posts().increment_views(post.id).await.unwrap();
    sealed.likes().toggle(post.id).await.unwrap();
    sealed
        .comments()
        .add(
            post.id,
            NewComment {
                name: "reader".into(),
                content: "still here".into(),
            },
        )
        .await
        .unwrap();
}
