/// Tweet handlers - short text posts attached to a channel.
use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::parse_id;
use crate::metrics;
use crate::response::ApiResponse;
use crate::services::tweets::TweetService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct TweetBody {
    pub content: String,
}

pub async fn create_tweet(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    body: web::Json<TweetBody>,
) -> Result<HttpResponse> {
    let service = TweetService::new((**pool).clone());
    let tweet = service.create(actor.0, &body.content).await?;

    metrics::MUTATIONS.with_label_values(&["create_tweet"]).inc();
    Ok(ApiResponse::created(tweet, "Tweet created successfully").into_response())
}

/// All tweets by a user, newest first, with like counts
pub async fn user_tweets(
    pool: web::Data<PgPool>,
    user_id: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = parse_id(&user_id, "user id")?;

    let service = TweetService::new((**pool).clone());
    let tweets = service.tweets_for_user(user_id).await?;

    metrics::READS.with_label_values(&["user_tweets"]).inc();
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully").into_response())
}

pub async fn update_tweet(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    tweet_id: web::Path<String>,
    body: web::Json<TweetBody>,
) -> Result<HttpResponse> {
    let tweet_id = parse_id(&tweet_id, "tweet id")?;

    let service = TweetService::new((**pool).clone());
    let tweet = service.update(actor.0, tweet_id, &body.content).await?;

    metrics::MUTATIONS.with_label_values(&["update_tweet"]).inc();
    Ok(ApiResponse::ok(tweet, "Tweet updated successfully").into_response())
}

pub async fn delete_tweet(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    tweet_id: web::Path<String>,
) -> Result<HttpResponse> {
    let tweet_id = parse_id(&tweet_id, "tweet id")?;

    let service = TweetService::new((**pool).clone());
    service.delete(actor.0, tweet_id).await?;

    metrics::MUTATIONS.with_label_values(&["delete_tweet"]).inc();
    Ok(
        ApiResponse::ok(serde_json::json!({ "tweet_id": tweet_id }), "Tweet deleted successfully")
            .into_response(),
    )
}
