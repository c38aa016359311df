use crate::models::{LikeTarget, LikedVideoItem, OwnerSummary};
use sqlx::PgPool;
use uuid::Uuid;

/// Conditional insert; returns true if a new like was created. Concurrent
/// toggles for the same (target, user) pair race on the unique constraint,
/// and the loser sees `false` instead of a duplicate row.
pub async fn insert_like(
    pool: &PgPool,
    target: LikeTarget,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO likes (target_kind, target_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (target_kind, target_id, user_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(target.kind.as_str())
    .bind(target.id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if a like was removed.
pub async fn delete_like(
    pool: &PgPool,
    target: LikeTarget,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE target_kind = $1 AND target_id = $2 AND user_id = $3
        "#,
    )
    .bind(target.kind.as_str())
    .bind(target.id)
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

#[derive(sqlx::FromRow)]
struct LikedVideoRow {
    id: Uuid,
    title: String,
    thumbnail_url: String,
    views: i64,
    owner_id: Uuid,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: String,
}

/// Videos the user has liked, joined with each video's owner summary,
/// most recently liked first.
pub async fn liked_videos(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<LikedVideoItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LikedVideoRow>(
        r#"
        SELECT v.id, v.title, v.thumbnail_url, v.views,
               u.id AS owner_id, u.username AS owner_username,
               u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM likes l
        JOIN videos v ON v.id = l.target_id
        JOIN users u ON u.id = v.owner_id
        WHERE l.target_kind = 'video' AND l.user_id = $1
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| LikedVideoItem {
            id: r.id,
            title: r.title,
            thumbnail_url: r.thumbnail_url,
            views: r.views,
            owner: OwnerSummary {
                id: r.owner_id,
                username: r.owner_username,
                full_name: r.owner_full_name,
                avatar_url: r.owner_avatar_url,
            },
        })
        .collect())
}

/// Users who liked a given video.
pub async fn video_likers(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Vec<OwnerSummary>, sqlx::Error> {
    let users = sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.target_kind = 'video' AND l.target_id = $1
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(video_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
