/// Subscription service: toggle plus the two channel listing read models.
use crate::db::{subscription_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::OwnerSummary;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a subscription; returns true when now subscribed.
    /// Self-subscription is rejected before any store access.
    pub async fn toggle(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        if subscriber_id == channel_id {
            return Err(AppError::Validation(
                "Cannot subscribe to your own channel".to_string(),
            ));
        }
        if !user_repo::user_exists(&self.pool, channel_id).await? {
            return Err(AppError::NotFound("Channel not found".to_string()));
        }

        if subscription_repo::insert_subscription(&self.pool, subscriber_id, channel_id).await? {
            return Ok(true);
        }
        subscription_repo::delete_subscription(&self.pool, subscriber_id, channel_id).await?;
        Ok(false)
    }

    /// All subscribers of a channel, unpaginated.
    pub async fn channel_subscribers(&self, channel_id: Uuid) -> Result<Vec<OwnerSummary>> {
        if !user_repo::user_exists(&self.pool, channel_id).await? {
            return Err(AppError::NotFound("Channel not found".to_string()));
        }
        Ok(subscription_repo::channel_subscribers(&self.pool, channel_id).await?)
    }

    /// All channels a user follows, unpaginated.
    pub async fn subscribed_channels(&self, subscriber_id: Uuid) -> Result<Vec<OwnerSummary>> {
        if !user_repo::user_exists(&self.pool, subscriber_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(subscription_repo::subscribed_channels(&self.pool, subscriber_id).await?)
    }
}
