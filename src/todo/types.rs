// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A task as stored, without its category annotations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// The category annotation attached to listed tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// A task together with its resolved categories; the list/create/update
/// response shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskWithCategories {
    #[serde(flatten)]
    pub task: Task,
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

/// Partial update of a task. `None` means "leave the field untouched";
/// for `description`, `Some(None)` means "clear it". The wire layer maps
/// omission vs explicit null onto these, so the ambiguity never reaches
/// the service.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug)]
pub enum TodoError {
    ValidationError(String),
    /// Row absent or owned by someone else, indistinguishably.
    NotFound,
    Store(StoreError),
}

impl std::fmt::Display for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoError::ValidationError(msg) => write!(f, "{}", msg),
            TodoError::NotFound => write!(f, "Not found"),
            TodoError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for TodoError {}

impl From<StoreError> for TodoError {
    fn from(value: StoreError) -> Self {
        TodoError::Store(value)
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(value: rusqlite::Error) -> Self {
        TodoError::Store(StoreError::Sql(value))
    }
}
