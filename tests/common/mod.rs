// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;

use tido::api;
use tido::config::Config;
use tido::iam::{AuthMiddlewareFactory, IamService, UserStore};
use tido::store::SqliteStore;
use tido::todo::TodoService;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestHarness {
    pub store: Arc<SqliteStore>,
    pub iam: Arc<IamService>,
    pub todos: Arc<TodoService>,
}

impl TestHarness {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.auth.jwt.secret = "test-secret-test-secret-test-secret!".to_string();
        // Cheap hashing params keep the suite fast.
        config.auth.password.memory_kib = Some(8192);
        config.auth.password.iterations = Some(1);
        let config = config.validate().expect("test config");

        let store = Arc::new(SqliteStore::open_in_memory().expect("test store"));
        let iam = Arc::new(IamService::new(
            &config,
            store.clone() as Arc<dyn UserStore>,
        ));
        let todos = Arc::new(TodoService::new(store.clone()));

        TestHarness { store, iam, todos }
    }
}

/// An App wired the same way as in main: auth middleware plus the /api routes.
pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::from(harness.iam.clone()))
        .app_data(web::Data::from(harness.todos.clone()))
        .wrap(AuthMiddlewareFactory)
        .configure(api::configure)
}

/// Register an account through the API and return its session cookie.
pub async fn register_user<S>(app: &S, email: &str) -> actix_web::cookie::Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(
        resp.status().is_success(),
        "registration for {} failed: {}",
        email,
        resp.status()
    );
    session_cookie(&resp)
}

/// Extract the session cookie from a register/login response.
pub fn session_cookie(resp: &ServiceResponse<BoxBody>) -> actix_web::cookie::Cookie<'static> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == "tido_auth")
        .expect("session cookie")
        .into_owned()
}

pub async fn read_json(resp: ServiceResponse<BoxBody>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}

/// POST /api/todos and return the created task as JSON.
pub async fn create_todo<S>(
    app: &S,
    cookie: &actix_web::cookie::Cookie<'static>,
    payload: Value,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/todos")
        .cookie(cookie.clone())
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "create todo: {}", resp.status());
    read_json(resp).await
}

/// POST /api/categories and return the created category as JSON.
pub async fn create_category<S>(
    app: &S,
    cookie: &actix_web::cookie::Cookie<'static>,
    payload: Value,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .cookie(cookie.clone())
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(
        resp.status().is_success(),
        "create category: {}",
        resp.status()
    );
    read_json(resp).await
}

/// GET /api/todos and return the list as JSON.
pub async fn list_todos<S>(app: &S, cookie: &actix_web::cookie::Cookie<'static>) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri("/api/todos")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "list todos: {}", resp.status());
    read_json(resp).await
}
