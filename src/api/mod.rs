// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::{HttpResponse, Result, web};
use serde_json::json;

mod auth;
mod categories;
mod error;
mod todos;

async fn hello() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "message": "Hello from tido!" })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/hello", web::get().to(hello))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/session", web::get().to(auth::session)),
            )
            .route("/todos", web::get().to(todos::list_todos))
            .route("/todos", web::post().to(todos::create_todo))
            .route("/todos/{id}", web::put().to(todos::update_todo))
            .route("/todos/{id}", web::delete().to(todos::delete_todo))
            .route("/categories", web::get().to(categories::list_categories))
            .route("/categories", web::post().to(categories::create_category))
            .route("/categories/{id}", web::put().to(categories::update_category))
            .route(
                "/categories/{id}",
                web::delete().to(categories::delete_category),
            ),
    );
}
