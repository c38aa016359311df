/// Identity resolution
///
/// The platform's auth service issues HS256 bearer tokens; this module
/// only verifies them and exposes the caller's user id to handlers.
/// `AuthUser` rejects unauthenticated requests, `MaybeAuthUser` lets
/// reads through and resolves to `None` when no token is presented.
use crate::error::AppError;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: usize,
}

/// Decoded verification material, shared as app data.
#[derive(Clone)]
pub struct AuthKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| AppError::Unauthorized(format!("Invalid access token: {e}")))
    }
}

/// Issue a token for `user_id`, valid for `ttl_secs`. Used by the test
/// suite and local tooling; production tokens come from the auth service.
pub fn issue_token(secret: &str, user_id: Uuid, ttl_secs: u64) -> String {
    let exp = chrono::Utc::now().timestamp() as usize + ttl_secs as usize;
    let claims = Claims { sub: user_id, exp };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HS256 signing cannot fail")
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn resolve(req: &HttpRequest) -> Result<Option<Uuid>, AppError> {
    let Some(token) = bearer_token(req) else {
        return Ok(None);
    };

    let keys = req
        .app_data::<web::Data<AuthKeys>>()
        .ok_or_else(|| AppError::Internal("AuthKeys app data missing".to_string()))?;

    keys.verify(token).map(Some)
}

/// Authenticated caller; extraction fails with 401 when the token is
/// missing or invalid.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match resolve(req) {
            Ok(Some(user_id)) => Ok(AuthUser(user_id)),
            Ok(None) => Err(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            )),
            Err(e) => Err(e),
        })
    }
}

/// Optionally authenticated caller. A missing token resolves to `None`;
/// a presented-but-invalid token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<Uuid>);

impl FromRequest for MaybeAuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(MaybeAuthUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const SECRET: &str = "test-secret";

    fn request_with(token: Option<&str>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(web::Data::new(AuthKeys::new(SECRET)));
        if let Some(token) = token {
            req = req.insert_header(("Authorization", format!("Bearer {token}")));
        }
        req.to_http_request()
    }

    #[actix_web::test]
    async fn valid_token_resolves_the_user() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, 60);
        let req = request_with(Some(&token));

        let AuthUser(resolved) = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(resolved, user_id);
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized_for_auth_user() {
        let req = request_with(None);
        let err = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[actix_web::test]
    async fn missing_token_is_anonymous_for_maybe_auth_user() {
        let req = request_with(None);
        let MaybeAuthUser(resolved) = MaybeAuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[actix_web::test]
    async fn wrong_secret_is_rejected_even_for_maybe_auth_user() {
        let token = issue_token("other-secret", Uuid::new_v4(), 60);
        let req = request_with(Some(&token));

        let err = MaybeAuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[actix_web::test]
    async fn expired_token_is_rejected() {
        let user_id = Uuid::new_v4();
        // Far enough in the past to clear the default leeway.
        let exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        let claims = Claims { sub: user_id, exp };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let req = request_with(Some(&token));
        let err = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
