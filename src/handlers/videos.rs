/// Video handlers - HTTP endpoints for the video listing, detail view,
/// and publish/update/delete mutations.
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::Result;
use crate::handlers::parse_id;
use crate::metrics;
use crate::response::ApiResponse;
use crate::services::videos::{
    ListVideosParams, PublishVideoRequest, UpdateVideoRequest, VideoService,
};
use crate::storage::MediaStorage;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

/// List videos with filtering, sorting and pagination
pub async fn list_videos(
    pool: web::Data<PgPool>,
    storage: web::Data<dyn MediaStorage>,
    query: web::Query<ListVideosQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let user_id = match query.user_id.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_id(raw, "user id")?),
        None => None,
    };

    let service = VideoService::new((**pool).clone(), storage.into_inner());
    let videos = service
        .list(ListVideosParams {
            page: query.page,
            limit: query.limit,
            query: query.query,
            sort_by: query.sort_by,
            sort_type: query.sort_type,
            user_id,
        })
        .await?;

    metrics::READS.with_label_values(&["list_videos"]).inc();
    Ok(ApiResponse::ok(videos, "Videos fetched successfully").into_response())
}

/// Get a single video with counts, viewer flags and comments; records
/// the watch for authenticated viewers.
pub async fn get_video(
    pool: web::Data<PgPool>,
    storage: web::Data<dyn MediaStorage>,
    video_id: web::Path<String>,
    viewer: MaybeAuthUser,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = VideoService::new((**pool).clone(), storage.into_inner());
    let video = service.detail(video_id, viewer.0).await?;

    metrics::READS.with_label_values(&["get_video"]).inc();
    Ok(ApiResponse::ok(
        serde_json::json!({ "video": video }),
        "Video fetched successfully",
    )
    .into_response())
}

/// Publish a new video
pub async fn publish_video(
    pool: web::Data<PgPool>,
    storage: web::Data<dyn MediaStorage>,
    owner: AuthUser,
    req: web::Json<PublishVideoRequest>,
) -> Result<HttpResponse> {
    let service = VideoService::new((**pool).clone(), storage.into_inner());
    let video = service.publish(owner.0, req.into_inner()).await?;

    metrics::MUTATIONS.with_label_values(&["publish_video"]).inc();
    Ok(ApiResponse::created(video, "Video published successfully").into_response())
}

/// Update title/description and optionally replace the thumbnail
pub async fn update_video(
    pool: web::Data<PgPool>,
    storage: web::Data<dyn MediaStorage>,
    actor: AuthUser,
    video_id: web::Path<String>,
    req: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = VideoService::new((**pool).clone(), storage.into_inner());
    let outcome = service.update(actor.0, video_id, req.into_inner()).await?;

    metrics::MUTATIONS.with_label_values(&["update_video"]).inc();
    Ok(ApiResponse::ok(outcome, "Video updated successfully").into_response())
}

/// Delete a video and everything referencing it
pub async fn delete_video(
    pool: web::Data<PgPool>,
    storage: web::Data<dyn MediaStorage>,
    actor: AuthUser,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = VideoService::new((**pool).clone(), storage.into_inner());
    let outcome = service.delete(actor.0, video_id).await?;

    metrics::MUTATIONS.with_label_values(&["delete_video"]).inc();
    Ok(ApiResponse::ok(outcome, "Video deleted successfully").into_response())
}
