/// External media store adapter
///
/// The platform stores video files and thumbnails in an external blob
/// store addressed by opaque keys. Handlers receive the store as an
/// injected `Arc<dyn MediaStorage>` so tests can substitute the
/// in-memory fake for the S3 client.
mod s3;

pub use s3::S3MediaStorage;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a blob under `key`; returns the public reference URL.
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;

    /// Remove the blob stored under `key`. Deleting a missing key is not
    /// an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Public URL a stored key resolves to.
    fn public_url(&self, key: &str) -> String;
}

/// Generate a fresh object key under `prefix` with an extension derived
/// from the content type.
pub fn new_media_key(prefix: &str, content_type: &str) -> String {
    let ext = match content_type {
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    };
    format!("{}/{}.{}", prefix, Uuid::new_v4(), ext)
}

/// In-memory store used by the test suite.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    fail_deletes: AtomicBool,
    fail_uploads: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deletes fail, to exercise best-effort cleanup paths.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().expect("storage lock").contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("storage lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaStorage for InMemoryStorage {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("upload rejected by fake".to_string()));
        }
        self.objects
            .lock()
            .expect("storage lock")
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("delete rejected by fake".to_string()));
        }
        self.objects.lock().expect("storage lock").remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_delete_round_trip() {
        let store = InMemoryStorage::new();
        let url = store
            .upload("videos/a.mp4", Bytes::from_static(b"data"), "video/mp4")
            .await
            .unwrap();

        assert_eq!(url, "memory://videos/a.mp4");
        assert!(store.contains("videos/a.mp4"));

        store.delete("videos/a.mp4").await.unwrap();
        assert!(!store.contains("videos/a.mp4"));
    }

    #[tokio::test]
    async fn deleting_a_missing_key_is_not_an_error() {
        let store = InMemoryStorage::new();
        assert!(store.delete("nope").await.is_ok());
    }

    #[tokio::test]
    async fn flaky_deletes_surface_storage_errors() {
        let store = InMemoryStorage::new();
        store
            .upload("thumbs/t.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        store.set_fail_deletes(true);
        let err = store.delete("thumbs/t.png").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        // Blob untouched after the failed delete.
        assert!(store.contains("thumbs/t.png"));
    }

    #[test]
    fn media_keys_carry_prefix_and_extension() {
        let key = new_media_key("videos", "video/mp4");
        assert!(key.starts_with("videos/"));
        assert!(key.ends_with(".mp4"));

        let key = new_media_key("thumbnails", "image/jpeg");
        assert!(key.starts_with("thumbnails/"));
        assert!(key.ends_with(".jpg"));

        assert!(new_media_key("x", "application/octet-stream").ends_with(".bin"));
    }

    #[test]
    fn media_keys_are_unique() {
        assert_ne!(
            new_media_key("videos", "video/mp4"),
            new_media_key("videos", "video/mp4")
        );
    }
}
