mod common;

use axum::http::header::COOKIE;
use axum::http::{HeaderValue, StatusCode};
use serde_json::json;

use common::{envelope, Harness, PASSWORD};
use tubelab::api::SessionView;
use tubelab::auth::SESSION_COOKIE;
use tubelab::model::Authority;

#[tokio::test]
async fn health_needs_no_session() {
    let harness = Harness::new().await;

    let response = harness.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(envelope(&response).is_ok());
}

#[tokio::test]
async fn signup_issues_a_usable_session() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/auth/signup")
        .json(&json!({
            "nickname": "okayu",
            "email": "okayu@example.com",
            "password": "onigiri",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let session: SessionView = serde_json::from_value(envelope(&response).payload.unwrap()).unwrap();
    assert_eq!(session.user.nickname, "okayu");
    assert_eq!(session.user.authority, Authority::User);
    assert_eq!(response.cookie(SESSION_COOKIE).value(), session.token);

    let response = common::authorized(harness.server.get("/subscriber/subscriptions"), &session.token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_is_refused() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/auth/signup")
        .json(&json!({
            "nickname": "impostor",
            "email": harness.user.email,
            "password": "whatever",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(envelope(&response).status.name, "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn signin_checks_the_password() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/auth/signin")
        .json(&json!({ "email": harness.user.email, "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let session: SessionView = serde_json::from_value(envelope(&response).payload.unwrap()).unwrap();
    assert_eq!(session.user.id, harness.user.id.key());

    let response = harness
        .server
        .post("/auth/signin")
        .json(&json!({ "email": harness.user.email, "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(envelope(&response).status.name, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let harness = Harness::new().await;

    let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", harness.token)).unwrap();
    let response = harness
        .server
        .get("/subscriber/subscriptions")
        .add_header(COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let harness = Harness::new().await;

    let response = common::authorized(
        harness.server.get("/subscriber/subscriptions"),
        &format!("{}x", harness.token),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(envelope(&response).status.name, "UNAUTHORIZED");
}
