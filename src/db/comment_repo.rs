use crate::models::{Comment, CommentView, OwnerSummary};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment on a video
pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, video_id, owner_id, content, created_at
        "#,
    )
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get a single comment by ID
pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, video_id, owner_id, content, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

#[derive(sqlx::FromRow)]
struct CommentViewRow {
    id: Uuid,
    video_id: Uuid,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    likes_count: i64,
    owner_id: Uuid,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: String,
}

/// Comments for a video with owner summary and per-comment like count,
/// newest first, paginated. Single join-aggregate: the LEFT JOIN keeps
/// zero-like comments in the page, and grouping happens before the slice
/// so each page's counts match its ordering.
pub async fn comments_for_video(
    pool: &PgPool,
    video_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentViewRow>(
        r#"
        SELECT c.id, c.video_id, c.content, c.created_at,
               COUNT(l.id) AS likes_count,
               u.id AS owner_id, u.username AS owner_username,
               u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM comments c
        JOIN users u ON u.id = c.owner_id
        LEFT JOIN likes l ON l.target_kind = 'comment' AND l.target_id = c.id
        WHERE c.video_id = $1
        GROUP BY c.id, u.id
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(video_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| CommentView {
            id: r.id,
            video_id: r.video_id,
            content: r.content,
            created_at: r.created_at,
            likes_count: r.likes_count,
            owner: OwnerSummary {
                id: r.owner_id,
                username: r.owner_username,
                full_name: r.owner_full_name,
                avatar_url: r.owner_avatar_url,
            },
        })
        .collect())
}

/// Full (unpaginated) comment list for the video-detail view.
pub async fn all_comments_for_video(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, video_id, owner_id, content, created_at
        FROM comments
        WHERE video_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Replace comment content
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2
        WHERE id = $1
        RETURNING id, video_id, owner_id, content, created_at
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment and any likes pointing at it
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE target_kind = 'comment' AND target_id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}
