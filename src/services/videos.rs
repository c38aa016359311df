/// Video service: listing, detail composition, publish/update/delete with
/// media-blob lifecycle.
use crate::db::{comment_repo, video_repo};
use crate::db::video_repo::{CascadeStats, SortDirection, SortKey, VideoListQuery};
use crate::error::{AppError, Result};
use crate::models::{Video, VideoDetail, VideoListItem};
use crate::services::Page;
use crate::storage::{new_media_key, MediaStorage};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// A media blob carried inline in a request body.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    /// Base64-encoded bytes
    pub data: String,
    pub content_type: String,
}

impl MediaPayload {
    fn decode(&self, what: &str) -> Result<Bytes> {
        let bytes = BASE64
            .decode(self.data.as_bytes())
            .map_err(|_| AppError::Validation(format!("{what} is not valid base64")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("{what} must not be empty")));
        }
        Ok(Bytes::from(bytes))
    }
}

#[derive(Debug, Clone)]
pub struct ListVideosParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PublishVideoRequest {
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub video: MediaPayload,
    pub thumbnail: MediaPayload,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<MediaPayload>,
}

/// Result of a video update, including the cleanup status of the
/// replaced thumbnail blob.
#[derive(Debug, serde::Serialize)]
pub struct VideoUpdateOutcome {
    #[serde(flatten)]
    pub video: Video,
    /// Present when the old thumbnail blob could not be removed; the
    /// update itself already succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_cleanup: Option<String>,
}

/// Result of a video delete: cascade counts plus per-blob cleanup status.
#[derive(Debug, serde::Serialize)]
pub struct VideoDeleteOutcome {
    pub video_id: Uuid,
    #[serde(flatten)]
    pub cascade: CascadeStats,
    pub video_blob_deleted: bool,
    pub thumbnail_blob_deleted: bool,
}

pub struct VideoService {
    pool: PgPool,
    storage: Arc<dyn MediaStorage>,
}

impl VideoService {
    pub fn new(pool: PgPool, storage: Arc<dyn MediaStorage>) -> Self {
        Self { pool, storage }
    }

    /// Paginated listing with optional free-text filter and uploader
    /// filter. An empty page is reported as NotFound, matching the
    /// listing contract.
    pub async fn list(&self, params: ListVideosParams) -> Result<Vec<VideoListItem>> {
        let sort_by = SortKey::parse(params.sort_by.as_deref())
            .ok_or_else(|| AppError::Validation("Unknown sort_by field".to_string()))?;
        let page = Page::from_params(params.page, params.limit);

        let videos = video_repo::list_videos(
            &self.pool,
            &VideoListQuery {
                text: params.query,
                owner_id: params.user_id,
                sort_by,
                sort_direction: SortDirection::parse(params.sort_type.as_deref()),
                limit: page.limit,
                offset: page.offset,
            },
        )
        .await?;

        if videos.is_empty() {
            return Err(AppError::NotFound("No videos found".to_string()));
        }
        Ok(videos)
    }

    /// Compose the single-video read model and, for authenticated
    /// viewers, record the watch. The view counter bumps at most once
    /// per (viewer, video); the value returned here is the pre-visit
    /// count, as the detail is composed before the watch is recorded.
    pub async fn detail(&self, video_id: Uuid, viewer: Option<Uuid>) -> Result<VideoDetail> {
        let mut detail = video_repo::video_detail(&self.pool, video_id, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        detail.comments = comment_repo::all_comments_for_video(&self.pool, video_id).await?;

        if let Some(user_id) = viewer {
            let first_watch = video_repo::register_view(&self.pool, user_id, video_id).await?;
            if first_watch {
                tracing::debug!(%video_id, %user_id, "first watch recorded");
            }
        }

        Ok(detail)
    }

    /// Upload both blobs, then persist the video row. If the thumbnail
    /// upload or the insert fails, already-uploaded blobs are removed
    /// best-effort before the error propagates.
    pub async fn publish(&self, owner_id: Uuid, req: PublishVideoRequest) -> Result<Video> {
        let title = crate::services::require_content(&req.title, "Title")?;
        let description = crate::services::require_content(&req.description, "Description")?;
        if req.duration < 0.0 {
            return Err(AppError::Validation("Duration must be non-negative".to_string()));
        }

        let video_bytes = req.video.decode("Video file")?;
        let thumb_bytes = req.thumbnail.decode("Thumbnail")?;

        let video_key = new_media_key("videos", &req.video.content_type);
        let video_url = self
            .storage
            .upload(&video_key, video_bytes, &req.video.content_type)
            .await?;

        let thumbnail_key = new_media_key("thumbnails", &req.thumbnail.content_type);
        let thumbnail_url = match self
            .storage
            .upload(&thumbnail_key, thumb_bytes, &req.thumbnail.content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.abandon_blob(&video_key).await;
                return Err(e);
            }
        };

        match video_repo::create_video(
            &self.pool,
            owner_id,
            title,
            description,
            &video_url,
            &video_key,
            &thumbnail_url,
            &thumbnail_key,
            req.duration,
        )
        .await
        {
            Ok(video) => Ok(video),
            Err(e) => {
                self.abandon_blob(&video_key).await;
                self.abandon_blob(&thumbnail_key).await;
                Err(e.into())
            }
        }
    }

    /// Replace title/description and optionally the thumbnail. Existence
    /// is checked before ownership. The old thumbnail blob is deleted
    /// after the row update; a failed delete never fails the update but
    /// is surfaced in the outcome.
    pub async fn update(
        &self,
        actor: Uuid,
        video_id: Uuid,
        req: UpdateVideoRequest,
    ) -> Result<VideoUpdateOutcome> {
        let existing = video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        if existing.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to update this video".to_string(),
            ));
        }

        let title = crate::services::require_content(&req.title, "Title")?;
        let description = crate::services::require_content(&req.description, "Description")?;

        let new_thumbnail = match &req.thumbnail {
            Some(payload) => {
                let bytes = payload.decode("Thumbnail")?;
                let key = new_media_key("thumbnails", &payload.content_type);
                let url = self
                    .storage
                    .upload(&key, bytes, &payload.content_type)
                    .await?;
                Some((url, key))
            }
            None => None,
        };

        let video = video_repo::update_video(
            &self.pool,
            video_id,
            title,
            description,
            new_thumbnail
                .as_ref()
                .map(|(url, key)| (url.as_str(), key.as_str())),
        )
        .await?;

        let mut thumbnail_cleanup = None;
        if new_thumbnail.is_some() {
            if let Err(e) = self.storage.delete(&existing.thumbnail_key).await {
                tracing::warn!(
                    key = %existing.thumbnail_key,
                    error = %e,
                    "old thumbnail blob not removed"
                );
                thumbnail_cleanup = Some(format!(
                    "old thumbnail {} could not be removed",
                    existing.thumbnail_key
                ));
            }
        }

        Ok(VideoUpdateOutcome {
            video,
            thumbnail_cleanup,
        })
    }

    /// Delete a video: transactional cascade over comments, likes and
    /// watch history, then best-effort removal of both media blobs.
    pub async fn delete(&self, actor: Uuid, video_id: Uuid) -> Result<VideoDeleteOutcome> {
        let video = video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        if video.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this video".to_string(),
            ));
        }

        let cascade = video_repo::delete_video_cascade(&self.pool, video_id).await?;

        let video_blob_deleted = self.try_delete_blob(&video.video_key).await;
        let thumbnail_blob_deleted = self.try_delete_blob(&video.thumbnail_key).await;

        Ok(VideoDeleteOutcome {
            video_id,
            cascade,
            video_blob_deleted,
            thumbnail_blob_deleted,
        })
    }

    async fn try_delete_blob(&self, key: &str) -> bool {
        match self.storage.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "media blob not removed");
                false
            }
        }
    }

    /// Cleanup for blobs orphaned by a failed publish.
    async fn abandon_blob(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "orphaned blob not removed");
        }
    }
}
