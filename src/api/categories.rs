// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::json;

use super::error::{map_todo_error, unauthorized};
use crate::iam::AuthRequest;
use crate::todo::{CategoryPatch, TodoService};

#[derive(Deserialize)]
pub(super) struct CreateCategoryRequest {
    name: String,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct UpdateCategoryRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

pub(super) async fn list_categories(
    req: HttpRequest,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };

    match todos.list_categories(&user.id) {
        Ok(categories) => Ok(HttpResponse::Ok().json(categories)),
        Err(err) => Ok(map_todo_error(
            err,
            "Category not found",
            "Failed to fetch categories",
        )),
    }
}

pub(super) async fn create_category(
    req: HttpRequest,
    payload: web::Json<CreateCategoryRequest>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };
    let payload = payload.into_inner();

    match todos.create_category(&user.id, &payload.name, payload.color.as_deref()) {
        Ok(category) => Ok(HttpResponse::Ok().json(category)),
        Err(err) => Ok(map_todo_error(
            err,
            "Category not found",
            "Failed to create category",
        )),
    }
}

pub(super) async fn update_category(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<UpdateCategoryRequest>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };
    let payload = payload.into_inner();

    let patch = CategoryPatch {
        name: payload.name,
        color: payload.color,
    };
    match todos.update_category(&user.id, path.into_inner(), &patch) {
        Ok(category) => Ok(HttpResponse::Ok().json(category)),
        Err(err) => Ok(map_todo_error(
            err,
            "Category not found",
            "Failed to update category",
        )),
    }
}

pub(super) async fn delete_category(
    req: HttpRequest,
    path: web::Path<i64>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };

    match todos.delete_category(&user.id, path.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" }))),
        Err(err) => Ok(map_todo_error(
            err,
            "Category not found",
            "Failed to delete category",
        )),
    }
}
