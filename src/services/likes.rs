/// Like service: polymorphic toggle and the two like-centric read models.
use crate::db::{comment_repo, like_repo, tweet_repo, video_repo};
use crate::error::{AppError, Result};
use crate::models::{LikeTarget, LikeTargetKind, LikedVideoItem, OwnerSummary};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a like; returns true when the like is now on. The target
    /// must exist. The conditional insert carries the race: if another
    /// toggle wins the insert, this call falls through to the delete
    /// branch instead of creating a duplicate.
    pub async fn toggle(&self, target: LikeTarget, user_id: Uuid) -> Result<bool> {
        self.ensure_target_exists(target).await?;

        if like_repo::insert_like(&self.pool, target, user_id).await? {
            return Ok(true);
        }
        like_repo::delete_like(&self.pool, target, user_id).await?;
        Ok(false)
    }

    /// Videos the caller has liked; an empty set is reported as NotFound.
    pub async fn liked_videos(&self, user_id: Uuid) -> Result<Vec<LikedVideoItem>> {
        let videos = like_repo::liked_videos(&self.pool, user_id).await?;
        if videos.is_empty() {
            return Err(AppError::NotFound("No liked videos found".to_string()));
        }
        Ok(videos)
    }

    /// Everyone who liked a video. The video must exist; nobody having
    /// liked it yet is a valid (empty) result.
    pub async fn video_likers(&self, video_id: Uuid) -> Result<Vec<OwnerSummary>> {
        if video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        Ok(like_repo::video_likers(&self.pool, video_id).await?)
    }

    async fn ensure_target_exists(&self, target: LikeTarget) -> Result<()> {
        let exists = match target.kind {
            LikeTargetKind::Video => video_repo::find_video_by_id(&self.pool, target.id)
                .await?
                .is_some(),
            LikeTargetKind::Comment => comment_repo::find_comment_by_id(&self.pool, target.id)
                .await?
                .is_some(),
            LikeTargetKind::Tweet => tweet_repo::find_tweet_by_id(&self.pool, target.id)
                .await?
                .is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "{} not found",
                target.kind.noun()
            )))
        }
    }
}
