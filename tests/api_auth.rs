// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

#[actix_web::test]
async fn register_sets_session_cookie_and_returns_user() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "First@Example.com",
            "name": "First User",
            "password": common::PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = common::session_cookie(&resp);
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));

    let json = common::read_json(resp).await;
    let user = json.get("user").expect("user payload");
    assert_eq!(
        user.get("email").and_then(Value::as_str),
        Some("first@example.com")
    );
    assert_eq!(
        user.get("name").and_then(Value::as_str),
        Some("First User")
    );
    assert!(user.get("id").and_then(Value::as_str).is_some());
}

#[actix_web::test]
async fn register_with_taken_email_is_conflict() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;
    common::register_user(&app, "taken@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "taken@example.com", "password": common::PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn register_rejects_short_password_and_bad_email() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    for payload in [
        json!({ "email": "ok@example.com", "password": "seven77" }),
        json!({ "email": "not-an-email", "password": common::PASSWORD }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn login_round_trip_reaches_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;
    common::register_user(&app, "login@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "login@example.com", "password": common::PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = common::session_cookie(&resp);

    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert_eq!(
        json.pointer("/user/email").and_then(Value::as_str),
        Some("login@example.com")
    );
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_both_unauthorized() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;
    common::register_user(&app, "known@example.com").await;

    for payload in [
        json!({ "email": "known@example.com", "password": "wrong-password" }),
        json!({ "email": "unknown@example.com", "password": common::PASSWORD }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = common::read_json(resp).await;
        assert_eq!(
            json.get("error").and_then(Value::as_str),
            Some("Invalid email or password")
        );
    }
}

#[actix_web::test]
async fn session_without_cookie_is_unauthorized() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/api/auth/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_clears_the_session_cookie() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;
    let cookie = common::register_user(&app, "logout@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cleared = common::session_cookie(&resp);
    assert!(cleared.value().is_empty());
}

#[actix_web::test]
async fn tampered_cookie_is_anonymous() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;
    let cookie = common::register_user(&app, "tamper@example.com").await;

    let tampered =
        actix_web::cookie::Cookie::new("tido_auth", format!("{}x", cookie.value()));
    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .cookie(tampered)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn hello_needs_no_session() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/api/hello").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert!(json.get("message").and_then(Value::as_str).is_some());
}
