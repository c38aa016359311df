use crate::models::OwnerSummary;
use sqlx::PgPool;
use uuid::Uuid;

/// Conditional insert; returns true if a new subscription was created.
/// Same discipline as likes: the unique (subscriber, channel) constraint
/// absorbs concurrent toggles.
pub async fn insert_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if a subscription was removed.
pub async fn delete_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM subscriptions
        WHERE subscriber_id = $1 AND channel_id = $2
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// All subscribers of a channel, unpaginated.
pub async fn channel_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<OwnerSummary>, sqlx::Error> {
    let subscribers = sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(subscribers)
}

/// All channels a user subscribes to, unpaginated.
pub async fn subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<OwnerSummary>, sqlx::Error> {
    let channels = sqlx::query_as::<_, OwnerSummary>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await?;

    Ok(channels)
}
