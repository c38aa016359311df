//! Media store contract tests through the trait object.
//!
//! Services hold the store as `Arc<dyn MediaStorage>`; these tests run
//! the same calls the services make, against the in-memory fake, and
//! pin down the failure-injection behavior the cleanup paths rely on.

use bytes::Bytes;
use std::sync::Arc;
use vidtube_service::error::AppError;
use vidtube_service::storage::{new_media_key, InMemoryStorage, MediaStorage};

#[tokio::test]
async fn upload_through_trait_object_returns_the_public_url() {
    let fake = Arc::new(InMemoryStorage::new());
    let storage: Arc<dyn MediaStorage> = fake.clone();

    let key = new_media_key("videos", "video/mp4");
    let url = storage
        .upload(&key, Bytes::from_static(b"frame data"), "video/mp4")
        .await
        .unwrap();

    assert_eq!(url, storage.public_url(&key));
    assert!(fake.contains(&key));
}

#[tokio::test]
async fn injected_upload_failure_surfaces_as_storage_error() {
    let fake = InMemoryStorage::new();
    fake.set_fail_uploads(true);

    let err = fake
        .upload("videos/x.mp4", Bytes::from_static(b"data"), "video/mp4")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(fake.is_empty());
}

#[tokio::test]
async fn delete_succeeds_again_once_the_failure_is_cleared() {
    let fake = InMemoryStorage::new();
    let key = new_media_key("thumbnails", "image/png");
    fake.upload(&key, Bytes::from_static(b"png"), "image/png")
        .await
        .unwrap();

    fake.set_fail_deletes(true);
    assert!(fake.delete(&key).await.is_err());
    assert!(fake.contains(&key));

    fake.set_fail_deletes(false);
    fake.delete(&key).await.unwrap();
    assert!(!fake.contains(&key));
}
