// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::json;

use super::error::unauthorized;
use crate::iam::{AuthRequest, IamError, IamService, User};

#[derive(Deserialize)]
pub(super) struct RegisterRequest {
    email: String,
    #[serde(default)]
    name: Option<String>,
    password: String,
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    password: String,
}

pub(super) async fn register(
    payload: web::Json<RegisterRequest>,
    iam: web::Data<IamService>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let result = iam.register(&payload.email, payload.name.as_deref(), &payload.password);
    match result {
        Ok((user, token)) => Ok(session_response(iam.as_ref(), &user, &token)),
        Err(IamError::EmailTaken) => {
            Ok(HttpResponse::Conflict().json(json!({ "error": "Email already registered" })))
        }
        Err(IamError::ValidationError(message)) => {
            Ok(HttpResponse::BadRequest().json(json!({ "error": message })))
        }
        Err(err) => {
            log::error!("Registration failed: {}", err);
            Ok(internal_error("Registration failed"))
        }
    }
}

pub(super) async fn login(
    payload: web::Json<LoginRequest>,
    iam: web::Data<IamService>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    match iam.login(&payload.email, &payload.password) {
        Ok((user, token)) => Ok(session_response(iam.as_ref(), &user, &token)),
        Err(IamError::InvalidCredentials) | Err(IamError::ValidationError(_)) => {
            // Unknown email, malformed email and wrong password all look the
            // same to the caller.
            Ok(HttpResponse::Unauthorized().json(json!({ "error": "Invalid email or password" })))
        }
        Err(err) => {
            log::error!("Login failed: {}", err);
            Ok(internal_error("Login failed"))
        }
    }
}

pub(super) async fn logout(iam: web::Data<IamService>) -> Result<HttpResponse> {
    let cookie = iam.jwt().create_logout_cookie();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Logged out successfully" })))
}

pub(super) async fn session(req: HttpRequest) -> Result<HttpResponse> {
    match req.user_info() {
        Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        None => Ok(unauthorized()),
    }
}

fn session_response(iam: &IamService, user: &User, token: &str) -> HttpResponse {
    let cookie = iam.jwt().create_auth_cookie(token);
    HttpResponse::Ok().cookie(cookie).json(json!({ "user": user }))
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}
