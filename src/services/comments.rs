/// Comment service: CRUD plus the paginated comments-for-video read model.
use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView};
use crate::services::Page;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments for a video, newest first, with owner summary and like
    /// count per comment. The video must exist, and an empty page is
    /// reported as NotFound, same as the listing endpoints.
    pub async fn comments_for_video(
        &self,
        video_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<CommentView>> {
        if video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let page = Page::from_params(page, limit);
        let comments =
            comment_repo::comments_for_video(&self.pool, video_id, page.limit, page.offset)
                .await?;
        if comments.is_empty() {
            return Err(AppError::NotFound("No comments found".to_string()));
        }
        Ok(comments)
    }

    pub async fn create(&self, actor: Uuid, video_id: Uuid, content: &str) -> Result<Comment> {
        let content = crate::services::require_content(content, "Comment")?;

        if video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        Ok(comment_repo::create_comment(&self.pool, video_id, actor, content).await?)
    }

    /// Existence is reported before ownership.
    pub async fn update(&self, actor: Uuid, comment_id: Uuid, content: &str) -> Result<Comment> {
        let content = crate::services::require_content(content, "Comment")?;

        let existing = comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
        if existing.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to update this comment".to_string(),
            ));
        }

        Ok(comment_repo::update_comment(&self.pool, comment_id, content).await?)
    }

    pub async fn delete(&self, actor: Uuid, comment_id: Uuid) -> Result<()> {
        let existing = comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
        if existing.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this comment".to_string(),
            ));
        }

        Ok(comment_repo::delete_comment(&self.pool, comment_id).await?)
    }
}
