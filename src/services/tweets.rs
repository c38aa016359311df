/// Tweet service: CRUD plus the tweets-for-user read model.
use crate::db::{tweet_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{Tweet, TweetView};
use sqlx::PgPool;
use uuid::Uuid;

pub struct TweetService {
    pool: PgPool,
}

impl TweetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, actor: Uuid, content: &str) -> Result<Tweet> {
        let content = crate::services::require_content(content, "Tweet")?;
        Ok(tweet_repo::create_tweet(&self.pool, actor, content).await?)
    }

    /// All tweets of a user with like counts, newest first. The user
    /// must exist, and an empty list is reported as NotFound, same as
    /// the listing endpoints.
    pub async fn tweets_for_user(&self, user_id: Uuid) -> Result<Vec<TweetView>> {
        if !user_repo::user_exists(&self.pool, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let tweets = tweet_repo::tweets_for_user(&self.pool, user_id).await?;
        if tweets.is_empty() {
            return Err(AppError::NotFound("No tweets found".to_string()));
        }
        Ok(tweets)
    }

    /// Existence is reported before ownership.
    pub async fn update(&self, actor: Uuid, tweet_id: Uuid, content: &str) -> Result<Tweet> {
        let content = crate::services::require_content(content, "Tweet")?;

        let existing = tweet_repo::find_tweet_by_id(&self.pool, tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;
        if existing.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to update this tweet".to_string(),
            ));
        }

        Ok(tweet_repo::update_tweet(&self.pool, tweet_id, content).await?)
    }

    pub async fn delete(&self, actor: Uuid, tweet_id: Uuid) -> Result<()> {
        let existing = tweet_repo::find_tweet_by_id(&self.pool, tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;
        if existing.owner_id != actor {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this tweet".to_string(),
            ));
        }

        Ok(tweet_repo::delete_tweet(&self.pool, tweet_id).await?)
    }
}
