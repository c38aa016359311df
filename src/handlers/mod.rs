/// HTTP request handlers
///
/// Handlers stay thin: parse/validate inputs, call the service layer,
/// wrap the result in the response envelope.
pub mod comments;
pub mod likes;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

pub use comments::*;
pub use likes::*;
pub use subscriptions::*;
pub use tweets::*;
pub use videos::*;

use crate::error::AppError;
use uuid::Uuid;

/// Parse a path identifier, reporting malformed ids as a validation
/// error rather than a routing failure.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_ids_parse() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "video id").unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let err = parse_id("not-a-uuid", "video id").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: Invalid video id");
    }
}
