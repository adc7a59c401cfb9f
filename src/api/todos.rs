// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::error::{map_todo_error, unauthorized};
use crate::iam::AuthRequest;
use crate::todo::{TaskPatch, TodoService};

#[derive(Deserialize)]
pub(super) struct CreateTodoRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "categoryIds")]
    category_ids: Option<Vec<i64>>,
}

/// Update payload with omission-vs-null kept distinct: an absent field
/// deserializes to `None`, an explicit `null` description to `Some(None)`.
#[derive(Deserialize)]
pub(super) struct UpdateTodoRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default, rename = "categoryIds")]
    category_ids: Option<Vec<i64>>,
}

fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub(super) async fn list_todos(
    req: HttpRequest,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };

    match todos.list_tasks(&user.id) {
        Ok(tasks) => Ok(HttpResponse::Ok().json(tasks)),
        Err(err) => Ok(map_todo_error(err, "Todo not found", "Failed to fetch todos")),
    }
}

pub(super) async fn create_todo(
    req: HttpRequest,
    payload: web::Json<CreateTodoRequest>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };
    let payload = payload.into_inner();

    let result = todos.create_task(
        &user.id,
        &payload.title,
        payload.description.as_deref(),
        payload.category_ids.as_deref(),
    );
    match result {
        Ok(task) => Ok(HttpResponse::Ok().json(task)),
        Err(err) => Ok(map_todo_error(err, "Category not found", "Failed to create todo")),
    }
}

pub(super) async fn update_todo(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<UpdateTodoRequest>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };
    let task_id = path.into_inner();
    let payload = payload.into_inner();

    let patch = TaskPatch {
        title: payload.title,
        description: payload.description,
        completed: payload.completed,
    };
    let result = todos.update_task(&user.id, task_id, &patch, payload.category_ids.as_deref());
    match result {
        Ok(task) => Ok(HttpResponse::Ok().json(task)),
        Err(err) => Ok(map_todo_error(err, "Todo not found", "Failed to update todo")),
    }
}

pub(super) async fn delete_todo(
    req: HttpRequest,
    path: web::Path<i64>,
    todos: web::Data<TodoService>,
) -> Result<HttpResponse> {
    let Some(user) = req.user_info() else {
        return Ok(unauthorized());
    };

    match todos.delete_task(&user.id, path.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" }))),
        Err(err) => Ok(map_todo_error(err, "Todo not found", "Failed to delete todo")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_distinguishes_absent_and_null_description() {
        let absent: UpdateTodoRequest = serde_json::from_str(r#"{"title":"t"}"#).expect("parse");
        assert!(absent.description.is_none());

        let null: UpdateTodoRequest =
            serde_json::from_str(r#"{"description":null}"#).expect("parse");
        assert_eq!(null.description, Some(None));

        let set: UpdateTodoRequest =
            serde_json::from_str(r#"{"description":"text"}"#).expect("parse");
        assert_eq!(set.description, Some(Some("text".to_string())));
    }

    #[test]
    fn update_payload_distinguishes_absent_and_empty_category_ids() {
        let absent: UpdateTodoRequest = serde_json::from_str(r#"{}"#).expect("parse");
        assert!(absent.category_ids.is_none());

        let empty: UpdateTodoRequest =
            serde_json::from_str(r#"{"categoryIds":[]}"#).expect("parse");
        assert_eq!(empty.category_ids, Some(vec![]));
    }
}
