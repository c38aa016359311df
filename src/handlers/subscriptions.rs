/// Subscription handlers - channel subscribe toggle and membership reads.
use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::parse_id;
use crate::metrics;
use crate::response::ApiResponse;
use crate::services::subscriptions::SubscriptionService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

pub async fn toggle_subscription(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    channel_id: web::Path<String>,
) -> Result<HttpResponse> {
    let channel_id = parse_id(&channel_id, "channel id")?;

    let service = SubscriptionService::new((**pool).clone());
    let subscribed = service.toggle(actor.0, channel_id).await?;

    let state = if subscribed { "on" } else { "off" };
    metrics::TOGGLES
        .with_label_values(&["subscription", state])
        .inc();

    let message = if subscribed {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(
        ApiResponse::ok(serde_json::json!({ "subscribed": subscribed }), message)
            .into_response(),
    )
}

/// Users subscribed to a channel
pub async fn channel_subscribers(
    pool: web::Data<PgPool>,
    channel_id: web::Path<String>,
) -> Result<HttpResponse> {
    let channel_id = parse_id(&channel_id, "channel id")?;

    let service = SubscriptionService::new((**pool).clone());
    let subscribers = service.channel_subscribers(channel_id).await?;

    metrics::READS
        .with_label_values(&["channel_subscribers"])
        .inc();
    Ok(ApiResponse::ok(
        serde_json::json!({
            "subscribers_count": subscribers.len(),
            "subscribers": subscribers,
        }),
        "Subscribers fetched successfully",
    )
    .into_response())
}

/// Channels a user is subscribed to
pub async fn subscribed_channels(
    pool: web::Data<PgPool>,
    subscriber_id: web::Path<String>,
) -> Result<HttpResponse> {
    let subscriber_id = parse_id(&subscriber_id, "subscriber id")?;

    let service = SubscriptionService::new((**pool).clone());
    let channels = service.subscribed_channels(subscriber_id).await?;

    metrics::READS
        .with_label_values(&["subscribed_channels"])
        .inc();
    Ok(ApiResponse::ok(
        serde_json::json!({
            "channels_count": channels.len(),
            "channels": channels,
        }),
        "Subscribed channels fetched successfully",
    )
    .into_response())
}
