/// Comment handlers - paginated listing per video plus CRUD.
use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::parse_id;
use crate::metrics;
use crate::response::ApiResponse;
use crate::services::comments::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct CommentsPageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

/// Comments for a video, newest first
pub async fn list_comments(
    pool: web::Data<PgPool>,
    video_id: web::Path<String>,
    query: web::Query<CommentsPageQuery>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = CommentService::new((**pool).clone());
    let comments = service
        .comments_for_video(video_id, query.page, query.limit)
        .await?;

    metrics::READS.with_label_values(&["list_comments"]).inc();
    Ok(ApiResponse::ok(comments, "Comments fetched successfully").into_response())
}

pub async fn add_comment(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    video_id: web::Path<String>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let video_id = parse_id(&video_id, "video id")?;

    let service = CommentService::new((**pool).clone());
    let comment = service.create(actor.0, video_id, &body.content).await?;

    metrics::MUTATIONS.with_label_values(&["add_comment"]).inc();
    Ok(ApiResponse::created(comment, "Comment added successfully").into_response())
}

pub async fn update_comment(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    comment_id: web::Path<String>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&comment_id, "comment id")?;

    let service = CommentService::new((**pool).clone());
    let comment = service.update(actor.0, comment_id, &body.content).await?;

    metrics::MUTATIONS
        .with_label_values(&["update_comment"])
        .inc();
    Ok(ApiResponse::ok(comment, "Comment updated successfully").into_response())
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    comment_id: web::Path<String>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&comment_id, "comment id")?;

    let service = CommentService::new((**pool).clone());
    service.delete(actor.0, comment_id).await?;

    metrics::MUTATIONS
        .with_label_values(&["delete_comment"])
        .inc();
    Ok(
        ApiResponse::ok(serde_json::json!({ "comment_id": comment_id }), "Comment deleted successfully")
            .into_response(),
    )
}
