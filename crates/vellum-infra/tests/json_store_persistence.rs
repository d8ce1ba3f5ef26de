//! Engine state survives a process restart when backed by the JSON-file
//! store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use vellum_core::Engine;
use vellum_core::domain::ContentBody;
use vellum_infra::JsonFileStore;

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (post_id, scheduled_id) = {
        let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
        let engine = Engine::new(store);

        let body =
            ContentBody::new("Kept", "text", "essays", vec!["zen".into()], "ada").unwrap();
        let post = engine.posts().create(body.clone()).await.unwrap();
        let entry = engine
            .scheduled()
            .create(body, Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        (post.id, entry.id)
    };

    // Reopen against the same directory, as a restarted process would.
    let store = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
    let engine = Engine::new(store);

    let post = engine.posts().get_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.body.title, "Kept");
    assert_eq!(post.version, 1);

    let entry = engine
        .scheduled()
        .get_by_id(scheduled_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.body.title, "Kept");
}
