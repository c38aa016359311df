/// Like handlers - toggles for each target kind and like-derived reads.
use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::parse_id;
use crate::metrics;
use crate::models::LikeTarget;
use crate::response::ApiResponse;
use crate::services::likes::LikeService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

fn toggle_response(target: &LikeTarget, liked: bool) -> HttpResponse {
    let state = if liked { "on" } else { "off" };
    metrics::TOGGLES.with_label_values(&["like", state]).inc();

    let message = if liked {
        format!("{} liked successfully", target.kind.noun())
    } else {
        format!("{} unliked successfully", target.kind.noun())
    };
    ApiResponse::ok(serde_json::json!({ "liked": liked }), message).into_response()
}

pub async fn toggle_video_like(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::video(parse_id(&video_id, "video id")?);

    let service = LikeService::new((**pool).clone());
    let liked = service.toggle(target, actor.0).await?;
    Ok(toggle_response(&target, liked))
}

pub async fn toggle_comment_like(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    comment_id: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::comment(parse_id(&comment_id, "comment id")?);

    let service = LikeService::new((**pool).clone());
    let liked = service.toggle(target, actor.0).await?;
    Ok(toggle_response(&target, liked))
}

pub async fn toggle_tweet_like(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    tweet_id: web::Path<String>,
) -> Result<HttpResponse> {
    let target = LikeTarget::tweet(parse_id(&tweet_id, "tweet id")?);

    let service = LikeService::new((**pool).clone());
    let liked = service.toggle(target, actor.0).await?;
    Ok(toggle_response(&target, liked))
}

/// Videos the caller has liked, most recently liked first
pub async fn liked_videos(pool: web::Data<PgPool>, actor: AuthUser) -> Result<HttpResponse> {
    let service = LikeService::new((**pool).clone());
    let videos = service.liked_videos(actor.0).await?;

    metrics::READS.with_label_values(&["liked_videos"]).inc();
    Ok(ApiResponse::ok(
        serde_json::json!({
            "total_videos": videos.len(),
            "videos": videos,
        }),
        "Liked videos fetched successfully",
    )
    .into_response())
}

/// Users who liked a video
pub async fn video_likers(
    pool: web::Data<PgPool>,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = LikeService::new((**pool).clone());
    let users = service.video_likers(video_id).await?;

    metrics::READS.with_label_values(&["video_likers"]).inc();
    Ok(ApiResponse::ok(
        serde_json::json!({ "users": users }),
        "Video likers fetched successfully",
    )
    .into_response())
}
