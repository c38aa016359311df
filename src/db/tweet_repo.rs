use crate::models::{OwnerSummary, Tweet, TweetView};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new tweet
pub async fn create_tweet(
    pool: &PgPool,
    owner_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        INSERT INTO tweets (owner_id, content)
        VALUES ($1, $2)
        RETURNING id, owner_id, content, created_at
        "#,
    )
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

/// Get a single tweet by ID
pub async fn find_tweet_by_id(
    pool: &PgPool,
    tweet_id: Uuid,
) -> Result<Option<Tweet>, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, owner_id, content, created_at
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(pool)
    .await?;

    Ok(tweet)
}

#[derive(sqlx::FromRow)]
struct TweetViewRow {
    id: Uuid,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
    likes_count: i64,
    owner_id: Uuid,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: String,
}

/// Tweets of a user with owner summary and like count, newest first.
pub async fn tweets_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TweetView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TweetViewRow>(
        r#"
        SELECT t.id, t.content, t.created_at,
               COUNT(l.id) AS likes_count,
               u.id AS owner_id, u.username AS owner_username,
               u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM tweets t
        JOIN users u ON u.id = t.owner_id
        LEFT JOIN likes l ON l.target_kind = 'tweet' AND l.target_id = t.id
        WHERE t.owner_id = $1
        GROUP BY t.id, u.id
        ORDER BY t.created_at DESC, t.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| TweetView {
            id: r.id,
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

/// Replace tweet content
pub async fn update_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        UPDATE tweets
        SET content = $2
        WHERE id = $1
        RETURNING id, owner_id, content, created_at
        "#,
    )
    .bind(tweet_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

/// Delete a tweet and any likes pointing at it
pub async fn delete_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE target_kind = 'tweet' AND target_id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}
