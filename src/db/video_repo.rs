use crate::models::{ChannelSummary, OwnerSummary, Video, VideoDetail, VideoListItem};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Whitelisted sort keys for the video listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Title,
    Description,
    Duration,
    Views,
}

impl SortKey {
    /// Parse a `sort_by` query parameter; `None` input falls back to
    /// creation time. Unknown keys are rejected so user input never
    /// reaches the ORDER BY clause.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("") | Some("created_at") | Some("createdAt") => Some(SortKey::CreatedAt),
            Some("title") => Some(SortKey::Title),
            Some("description") => Some(SortKey::Description),
            Some("duration") => Some(SortKey::Duration),
            Some("views") => Some(SortKey::Views),
            Some(_) => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::Title => "title",
            SortKey::Description => "description",
            SortKey::Duration => "duration",
            SortKey::Views => "views",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `sort_type` parameter; anything other than "asc" sorts descending,
    /// matching the listing's default of newest-first.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") | Some("ASC") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Escape LIKE metacharacters so a free-text query is matched literally.
pub fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Filter and slice description for [`list_videos`].
#[derive(Debug, Clone)]
pub struct VideoListQuery {
    pub text: Option<String>,
    pub owner_id: Option<Uuid>,
    pub sort_by: SortKey,
    pub sort_direction: SortDirection,
    pub limit: i64,
    pub offset: i64,
}

#[derive(sqlx::FromRow)]
struct VideoListRow {
    id: Uuid,
    title: String,
    description: String,
    video_url: String,
    thumbnail_url: String,
    duration: f64,
    views: i64,
    is_published: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: String,
}

impl From<VideoListRow> for VideoListItem {
    fn from(row: VideoListRow) -> Self {
        VideoListItem {
            id: row.id,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            owner: OwnerSummary {
                id: row.owner_id,
                username: row.owner_username,
                full_name: row.owner_full_name,
                avatar_url: row.owner_avatar_url,
            },
        }
    }
}

/// List videos with owner summaries: optional case-insensitive substring
/// match over title OR description, optional uploader filter, whitelisted
/// sort, offset pagination.
pub async fn list_videos(
    pool: &PgPool,
    query: &VideoListQuery,
) -> Result<Vec<VideoListItem>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.is_published, v.created_at,
               u.id AS owner_id, u.username AS owner_username,
               u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE 1 = 1
        "#,
    );

    if let Some(text) = query.text.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = format!("%{}%", escape_like(text.trim()));
        qb.push(" AND (v.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR v.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }

    if let Some(owner_id) = query.owner_id {
        qb.push(" AND v.owner_id = ");
        qb.push_bind(owner_id);
    }

    // Sort key and direction come from closed enums, never raw input.
    qb.push(" ORDER BY v.");
    qb.push(query.sort_by.column());
    qb.push(" ");
    qb.push(query.sort_direction.keyword());

    qb.push(" LIMIT ");
    qb.push_bind(query.limit);
    qb.push(" OFFSET ");
    qb.push_bind(query.offset);

    let rows = qb
        .build_query_as::<VideoListRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(VideoListItem::from).collect())
}

#[derive(sqlx::FromRow)]
struct VideoDetailRow {
    id: Uuid,
    title: String,
    description: String,
    video_url: String,
    thumbnail_url: String,
    duration: f64,
    views: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    likes_count: i64,
    is_liked: bool,
    owner_id: Uuid,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: String,
    subscribers_count: i64,
    is_subscribed: bool,
}

/// Single-video read model: like count, viewer's like flag, owner with
/// subscriber count and viewer's subscription flag. Both flags are false
/// for unauthenticated viewers (`viewer = None` matches no rows).
///
/// The comment list is attached by the service layer.
pub async fn video_detail(
    pool: &PgPool,
    video_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<VideoDetail>, sqlx::Error> {
    let row = sqlx::query_as::<_, VideoDetailRow>(
        r#"
        SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url,
               v.duration, v.views, v.created_at,
               (SELECT COUNT(*) FROM likes l
                 WHERE l.target_kind = 'video' AND l.target_id = v.id) AS likes_count,
               EXISTS(SELECT 1 FROM likes l
                 WHERE l.target_kind = 'video' AND l.target_id = v.id
                   AND l.user_id = $2) AS is_liked,
               u.id AS owner_id, u.username AS owner_username,
               u.full_name AS owner_full_name, u.avatar_url AS owner_avatar_url,
               (SELECT COUNT(*) FROM subscriptions s
                 WHERE s.channel_id = u.id) AS subscribers_count,
               EXISTS(SELECT 1 FROM subscriptions s
                 WHERE s.channel_id = u.id AND s.subscriber_id = $2) AS is_subscribed
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .bind(viewer)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| VideoDetail {
        id: r.id,
        title: r.title,
        description: r.description,
        video_url: r.video_url,
        thumbnail_url: r.thumbnail_url,
        duration: r.duration,
        views: r.views,
        created_at: r.created_at,
        likes_count: r.likes_count,
        is_liked: r.is_liked,
        owner: ChannelSummary {
            id: r.owner_id,
            username: r.owner_username,
            full_name: r.owner_full_name,
            avatar_url: r.owner_avatar_url,
            subscribers_count: r.subscribers_count,
            is_subscribed: r.is_subscribed,
        },
        comments: Vec::new(),
    }))
}

/// Record a watch and bump the view counter in one statement.
///
/// The watch-history primary key gates the increment: the UPDATE only
/// fires when the INSERT actually inserted, so repeat or concurrent views
/// by the same user never double-count. Returns true on first watch.
///
/// The video can be deleted between the detail read and this call; the
/// resulting foreign-key violation means there is nothing left to count
/// and resolves to `false` rather than an error.
pub async fn register_view(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        WITH first_watch AS (
            INSERT INTO watch_history (user_id, video_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, video_id) DO NOTHING
            RETURNING video_id
        )
        UPDATE videos v
        SET views = views + 1
        FROM first_watch fw
        WHERE v.id = fw.video_id
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await;

    match result {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Ok(false),
        Err(e) => Err(e),
    }
}

pub async fn find_video_by_id(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Option<Video>, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, owner_id, title, description, video_url, video_key,
               thumbnail_url, thumbnail_key, duration, views, is_published, created_at
        FROM videos
        WHERE id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    video_key: &str,
    thumbnail_url: &str,
    thumbnail_key: &str,
    duration: f64,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, video_key,
                            thumbnail_url, thumbnail_key, duration)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, owner_id, title, description, video_url, video_key,
                  thumbnail_url, thumbnail_key, duration, views, is_published, created_at
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(video_key)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .bind(duration)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

/// Replace title/description and, when a new thumbnail was uploaded, the
/// thumbnail reference.
pub async fn update_video(
    pool: &PgPool,
    video_id: Uuid,
    title: &str,
    description: &str,
    thumbnail: Option<(&str, &str)>,
) -> Result<Video, sqlx::Error> {
    let (thumbnail_url, thumbnail_key) = match thumbnail {
        Some((url, key)) => (Some(url), Some(key)),
        None => (None, None),
    };

    let video = sqlx::query_as::<_, Video>(
        r#"
        UPDATE videos
        SET title = $2,
            description = $3,
            thumbnail_url = COALESCE($4, thumbnail_url),
            thumbnail_key = COALESCE($5, thumbnail_key)
        WHERE id = $1
        RETURNING id, owner_id, title, description, video_url, video_key,
                  thumbnail_url, thumbnail_key, duration, views, is_published, created_at
        "#,
    )
    .bind(video_id)
    .bind(title)
    .bind(description)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

/// Row counts removed by a video-delete cascade.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct CascadeStats {
    pub comments_removed: u64,
    pub likes_removed: u64,
    pub watch_entries_removed: u64,
}

/// Delete a video and everything referencing it, in one transaction:
/// likes of the video and of its comments, the comments themselves, and
/// its rows in every user's watch history. External blobs are the
/// caller's responsibility (best-effort, after commit).
pub async fn delete_video_cascade(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<CascadeStats, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut stats = CascadeStats::default();

    stats.likes_removed += sqlx::query(
        r#"
        DELETE FROM likes
        WHERE target_kind = 'comment'
          AND target_id IN (SELECT id FROM comments WHERE video_id = $1)
        "#,
    )
    .bind(video_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    stats.likes_removed += sqlx::query(
        "DELETE FROM likes WHERE target_kind = 'video' AND target_id = $1",
    )
    .bind(video_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    stats.comments_removed = sqlx::query("DELETE FROM comments WHERE video_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    stats.watch_entries_removed = sqlx::query("DELETE FROM watch_history WHERE video_id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_defaults_to_created_at() {
        assert_eq!(SortKey::parse(None), Some(SortKey::CreatedAt));
        assert_eq!(SortKey::parse(Some("")), Some(SortKey::CreatedAt));
        assert_eq!(SortKey::parse(Some("createdAt")), Some(SortKey::CreatedAt));
    }

    #[test]
    fn sort_key_rejects_unknown_columns() {
        assert_eq!(SortKey::parse(Some("owner_id; DROP TABLE videos")), None);
        assert_eq!(SortKey::parse(Some("views")), Some(SortKey::Views));
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
