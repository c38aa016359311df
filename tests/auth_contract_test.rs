//! HTTP auth contract tests.
//!
//! Drives the access-token extractors through a minimal actix app and
//! checks the error envelope shape callers depend on.

use actix_web::{test, web, App, HttpResponse};
use uuid::Uuid;
use vidtube_service::auth::{issue_token, AuthKeys, AuthUser, MaybeAuthUser};
use vidtube_service::response::ApiResponse;

const SECRET: &str = "contract-test-secret";

async fn whoami(user: AuthUser) -> HttpResponse {
    ApiResponse::ok(
        serde_json::json!({ "user_id": user.0 }),
        "Caller resolved successfully",
    )
    .into_response()
}

async fn whoami_optional(viewer: MaybeAuthUser) -> HttpResponse {
    ApiResponse::ok(
        serde_json::json!({ "user_id": viewer.0 }),
        "Caller resolved successfully",
    )
    .into_response()
}

fn app_keys() -> web::Data<AuthKeys> {
    web::Data::new(AuthKeys::new(SECRET))
}

#[actix_web::test]
async fn valid_token_resolves_the_caller() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let user_id = Uuid::new_v4();
    let token = issue_token(SECRET, user_id, 3600);
    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();

    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["data"]["user_id"], user_id.to_string());
}

#[actix_web::test]
async fn missing_token_is_rejected_with_the_error_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert!(body["message"].as_str().unwrap().contains("Unauthorized"));
}

#[actix_web::test]
async fn garbage_token_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let token = issue_token("some-other-secret", Uuid::new_v4(), 3600);
    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn optional_auth_lets_anonymous_reads_through() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami_optional)),
    )
    .await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["user_id"].is_null());
}

#[actix_web::test]
async fn optional_auth_still_rejects_invalid_tokens() {
    let app = test::init_service(
        App::new()
            .app_data(app_keys())
            .route("/whoami", web::get().to(whoami_optional)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("Authorization", "Bearer forged"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
