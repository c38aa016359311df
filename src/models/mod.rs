/// Data models for vidtube-service
///
/// Persisted entities (`User`, `Video`, `Comment`, `Tweet`) map 1:1 onto
/// table rows. The remaining types are denormalized view objects produced
/// by the read-model queries: owner summaries, per-item like counts, and
/// viewer-specific flags.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub video_key: String,
    pub thumbnail_url: String,
    pub thumbnail_key: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tweet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Kind half of a polymorphic like target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTargetKind {
    Video,
    Comment,
    Tweet,
}

impl LikeTargetKind {
    /// Tag stored in the `likes.target_kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            LikeTargetKind::Video => "video",
            LikeTargetKind::Comment => "comment",
            LikeTargetKind::Tweet => "tweet",
        }
    }

    /// Human-readable noun for response messages.
    pub fn noun(self) -> &'static str {
        match self {
            LikeTargetKind::Video => "Video",
            LikeTargetKind::Comment => "Comment",
            LikeTargetKind::Tweet => "Tweet",
        }
    }
}

/// A like target: exactly one of video/comment/tweet, enforced by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeTarget {
    pub kind: LikeTargetKind,
    pub id: Uuid,
}

impl LikeTarget {
    pub fn video(id: Uuid) -> Self {
        Self {
            kind: LikeTargetKind::Video,
            id,
        }
    }

    pub fn comment(id: Uuid) -> Self {
        Self {
            kind: LikeTargetKind::Comment,
            id,
        }
    }

    pub fn tweet(id: Uuid) -> Self {
        Self {
            kind: LikeTargetKind::Tweet,
            id,
        }
    }
}

/// Owner / user summary embedded in view objects.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

/// One entry of the paginated video listing.
#[derive(Debug, Clone, Serialize)]
pub struct VideoListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerSummary,
}

/// Owner summary extended with channel stats for the video-detail view.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}

/// Fully denormalized single-video view.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub is_liked: bool,
    pub owner: ChannelSummary,
    pub comments: Vec<Comment>,
}

/// Comment joined with its owner summary and like count.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub owner: OwnerSummary,
}

/// Tweet joined with its owner summary and like count.
#[derive(Debug, Clone, Serialize)]
pub struct TweetView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub owner: OwnerSummary,
}

/// One entry of the caller's liked-videos listing.
#[derive(Debug, Clone, Serialize)]
pub struct LikedVideoItem {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: String,
    pub views: i64,
    pub owner: OwnerSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_target_constructors_set_the_kind() {
        let id = Uuid::new_v4();
        assert_eq!(LikeTarget::video(id).kind, LikeTargetKind::Video);
        assert_eq!(LikeTarget::comment(id).kind, LikeTargetKind::Comment);
        assert_eq!(LikeTarget::tweet(id).kind, LikeTargetKind::Tweet);
        assert_eq!(LikeTarget::video(id).id, id);
    }

    #[test]
    fn target_kind_tags_match_schema_check_constraint() {
        assert_eq!(LikeTargetKind::Video.as_str(), "video");
        assert_eq!(LikeTargetKind::Comment.as_str(), "comment");
        assert_eq!(LikeTargetKind::Tweet.as_str(), "tweet");
    }
}
