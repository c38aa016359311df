/// Business logic layer
///
/// Services own the precondition ordering (existence before ownership),
/// input validation, and read-model composition; repositories in `db`
/// stay single-query.
pub mod comments;
pub mod likes;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

pub use comments::CommentService;
pub use likes::LikeService;
pub use subscriptions::SubscriptionService;
pub use tweets::TweetService;
pub use videos::VideoService;

/// A validated pagination window. `page` is 1-based; `limit` is clamped
/// to [1, 100] with a default of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

impl Page {
    pub fn from_params(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self {
            limit,
            offset: (page - 1) * limit,
        }
    }
}

/// Reject empty or whitespace-only content bodies; returns the trimmed
/// content on success.
pub(crate) fn require_content<'a>(
    content: &'a str,
    what: &str,
) -> crate::error::Result<&'a str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AppError::Validation(format!(
            "{what} content is required"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_first_ten() {
        let page = Page::from_params(None, None);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let page = Page::from_params(Some(3), Some(25));
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let page = Page::from_params(Some(0), Some(0));
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 0);

        let page = Page::from_params(Some(-5), Some(100_000));
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn content_must_be_non_empty_after_trim() {
        assert!(require_content("  ", "Comment").is_err());
        assert_eq!(require_content(" hi ", "Comment").unwrap(), "hi");
    }
}
