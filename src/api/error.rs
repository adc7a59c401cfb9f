// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::HttpResponse;
use serde_json::json;

use crate::todo::TodoError;

/// 401 body for any protected route hit without a valid session.
pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))
}

/// Map a service error onto the wire taxonomy: validation detail is passed
/// through as 400, NotFound conflates absent and not-yours as 404, and store
/// failures are logged server-side but surface only as a generic 500.
pub(crate) fn map_todo_error(
    err: TodoError,
    not_found_message: &str,
    internal_message: &str,
) -> HttpResponse {
    match err {
        TodoError::ValidationError(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        TodoError::NotFound => HttpResponse::NotFound().json(json!({ "error": not_found_message })),
        TodoError::Store(store_err) => {
            log::error!("{}: {}", internal_message, store_err);
            HttpResponse::InternalServerError().json(json!({ "error": internal_message }))
        }
    }
}
