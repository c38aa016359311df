/// Uniform success envelope: `{ statusCode, data, message, success }`.
///
/// `success` is derived from the status code (`statusCode < 400`), matching
/// the error envelope produced by [`crate::error::AppError`].
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
            message: message.into(),
            success: status_code.as_u16() < 400,
        }
    }

    /// 200 OK envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    /// 201 Created envelope.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        HttpResponse::build(status).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_camel_case_keys() {
        let body = serde_json::to_value(ApiResponse::ok(
            serde_json::json!({"hello": "world"}),
            "Fetched",
        ))
        .unwrap();

        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"]["hello"], "world");
        assert_eq!(body["message"], "Fetched");
        assert_eq!(body["success"], true);
    }

    #[test]
    fn created_envelope_is_201_and_successful() {
        let body = serde_json::to_value(ApiResponse::created((), "Created")).unwrap();
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["success"], true);
    }
}
