//! Integration tests: database-level invariants.
//!
//! These run against a real PostgreSQL database (`#[sqlx::test]` provisions
//! a fresh schema from ./migrations per test).
//!
//! Coverage:
//! - Double-toggle of likes and subscriptions returns to the original state
//! - Video-delete cascade removes comments, likes and watch history
//! - Repeat views by the same user bump the counter exactly once
//! - Listing pages are contiguous, non-overlapping slices
//! - Empty comment pages and tweet lists report NotFound
//! - View registration tolerates the video disappearing mid-request

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use vidtube_service::db::{like_repo, video_repo};
use vidtube_service::error::AppError;
use vidtube_service::models::LikeTarget;
use vidtube_service::services::videos::ListVideosParams;
use vidtube_service::services::{
    CommentService, LikeService, SubscriptionService, TweetService, VideoService,
};
use vidtube_service::storage::InMemoryStorage;

async fn create_user(pool: &PgPool, username: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (username, full_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(username)
    .bind(format!("{username} test"))
    .fetch_one(pool)
    .await
    .expect("failed to create user")
}

async fn create_video(pool: &PgPool, owner_id: Uuid, title: &str) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, video_key,
                            thumbnail_url, thumbnail_key, duration)
        VALUES ($1, $2, 'a test video', 'memory://videos/v.mp4', 'videos/v.mp4',
                'memory://thumbnails/t.png', 'thumbnails/t.png', 12.5)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .expect("failed to create video")
}

fn video_service(pool: &PgPool) -> VideoService {
    VideoService::new(pool.clone(), Arc::new(InMemoryStorage::new()))
}

#[sqlx::test]
async fn double_toggle_like_returns_to_original_state(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    let liker = create_user(&pool, "liker").await;
    let video_id = create_video(&pool, owner, "toggle me").await;
    let target = LikeTarget::video(video_id);

    let service = LikeService::new(pool.clone());
    assert!(service.toggle(target, liker).await.unwrap());
    assert!(!service.toggle(target, liker).await.unwrap());

    let likers = like_repo::video_likers(&pool, video_id).await.unwrap();
    assert!(likers.is_empty());

    // Toggling back on leaves exactly one row, never a duplicate.
    assert!(service.toggle(target, liker).await.unwrap());
    let likers = like_repo::video_likers(&pool, video_id).await.unwrap();
    assert_eq!(likers.len(), 1);
    assert_eq!(likers[0].id, liker);
}

#[sqlx::test]
async fn double_toggle_subscription_returns_to_original_state(pool: PgPool) {
    let channel = create_user(&pool, "channel").await;
    let fan = create_user(&pool, "fan").await;

    let service = SubscriptionService::new(pool.clone());
    assert!(service.toggle(fan, channel).await.unwrap());
    assert!(!service.toggle(fan, channel).await.unwrap());

    let subscribers = service.channel_subscribers(channel).await.unwrap();
    assert!(subscribers.is_empty());
}

#[sqlx::test]
async fn self_subscription_never_creates_a_row(pool: PgPool) {
    let user = create_user(&pool, "narcissus").await;

    let service = SubscriptionService::new(pool.clone());
    let err = service.toggle(user, user).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let subscribers = service.channel_subscribers(user).await.unwrap();
    assert!(subscribers.is_empty());
}

#[sqlx::test]
async fn repeat_views_by_the_same_user_count_once(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    let viewer = create_user(&pool, "viewer").await;
    let video_id = create_video(&pool, owner, "watch me").await;

    assert!(video_repo::register_view(&pool, viewer, video_id)
        .await
        .unwrap());
    assert!(!video_repo::register_view(&pool, viewer, video_id)
        .await
        .unwrap());

    let video = video_repo::find_video_by_id(&pool, video_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(video.views, 1);

    // A different user is a fresh (user, video) pair.
    let other = create_user(&pool, "other").await;
    assert!(video_repo::register_view(&pool, other, video_id)
        .await
        .unwrap());
    let video = video_repo::find_video_by_id(&pool, video_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(video.views, 2);
}

#[sqlx::test]
async fn view_registration_tolerates_a_deleted_video(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    let viewer = create_user(&pool, "viewer").await;
    let video_id = create_video(&pool, owner, "short lived").await;

    video_repo::delete_video_cascade(&pool, video_id)
        .await
        .unwrap();

    // The gone video resolves to "nothing to count", not an error.
    assert!(!video_repo::register_view(&pool, viewer, video_id)
        .await
        .unwrap());
}

#[sqlx::test]
async fn video_delete_cascades_to_comments_likes_and_watch_history(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    let fan = create_user(&pool, "fan").await;
    let video_id = create_video(&pool, owner, "doomed").await;

    let comments = CommentService::new(pool.clone());
    let comment = comments.create(fan, video_id, "nice").await.unwrap();

    let likes = LikeService::new(pool.clone());
    likes
        .toggle(LikeTarget::video(video_id), fan)
        .await
        .unwrap();
    likes
        .toggle(LikeTarget::comment(comment.id), owner)
        .await
        .unwrap();
    video_repo::register_view(&pool, fan, video_id).await.unwrap();

    let service = video_service(&pool);
    let outcome = service.delete(owner, video_id).await.unwrap();
    assert_eq!(outcome.cascade.comments_removed, 1);
    assert_eq!(outcome.cascade.likes_removed, 2);
    assert_eq!(outcome.cascade.watch_entries_removed, 1);

    // Nothing referencing the video survives.
    assert!(video_repo::find_video_by_id(&pool, video_id)
        .await
        .unwrap()
        .is_none());
    let leftover_likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(leftover_likes, 0);
    let leftover_comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(leftover_comments, 0);
    let leftover_watches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watch_history")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(leftover_watches, 0);

    let err = service.detail(video_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn listing_pages_are_contiguous_slices(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    for i in 0..5 {
        create_video(&pool, owner, &format!("video {i}")).await;
    }

    let service = video_service(&pool);
    let params = |page| ListVideosParams {
        page: Some(page),
        limit: Some(2),
        query: None,
        sort_by: Some("title".to_string()),
        sort_type: Some("asc".to_string()),
        user_id: None,
    };

    let first = service.list(params(1)).await.unwrap();
    let second = service.list(params(2)).await.unwrap();
    let third = service.list(params(3)).await.unwrap();

    let titles: Vec<String> = first
        .iter()
        .chain(second.iter())
        .chain(third.iter())
        .map(|v| v.title.clone())
        .collect();
    assert_eq!(
        titles,
        vec!["video 0", "video 1", "video 2", "video 3", "video 4"]
    );

    // Past-the-end page is empty, which the listing reports as NotFound.
    let err = service.list(params(4)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn empty_comment_page_is_not_found(pool: PgPool) {
    let owner = create_user(&pool, "uploader").await;
    let video_id = create_video(&pool, owner, "quiet").await;

    let service = CommentService::new(pool.clone());
    let err = service
        .comments_for_video(video_id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // A missing video still takes precedence over the empty page.
    let err = service
        .comments_for_video(Uuid::new_v4(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
async fn empty_tweet_list_is_not_found(pool: PgPool) {
    let user = create_user(&pool, "lurker").await;

    let service = TweetService::new(pool.clone());
    let err = service.tweets_for_user(user).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Posting a tweet makes the same listing succeed.
    service.create(user, "first!").await.unwrap();
    let tweets = service.tweets_for_user(user).await.unwrap();
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweets[0].content, "first!");
}
