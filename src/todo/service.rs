// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::sync::Arc;

use super::types::{
    Category, CategoryPatch, CategoryRef, DEFAULT_CATEGORY_COLOR, Task, TaskPatch,
    TaskWithCategories, TodoError,
};
use crate::store::{SqliteStore, format_timestamp, timestamp_from_column};

/// Task/Category service: the sole mutator of the tasks, categories and
/// task_categories tables. Every operation is scoped to the calling owner,
/// and every multi-step mutation runs in a single transaction.
pub struct TodoService {
    store: Arc<SqliteStore>,
}

impl TodoService {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        TodoService { store }
    }

    /// The caller's tasks, newest first, each annotated with its categories.
    pub fn list_tasks(&self, owner: &str) -> Result<Vec<TaskWithCategories>, TodoError> {
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, completed, owner_id, created_at, updated_at \
                 FROM tasks WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let tasks = stmt
                .query_map(params![owner], task_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            // One join query per task.
            tasks
                .into_iter()
                .map(|task| {
                    let categories = categories_for_task(conn, task.id)?;
                    Ok(TaskWithCategories { task, categories })
                })
                .collect()
        })
    }

    pub fn create_task(
        &self,
        owner: &str,
        title: &str,
        description: Option<&str>,
        category_ids: Option<&[i64]>,
    ) -> Result<TaskWithCategories, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::ValidationError("Title is required".to_string()));
        }

        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;

            if let Some(ids) = category_ids {
                ensure_categories_owned(&tx, owner, ids)?;
            }

            let now = format_timestamp(&Utc::now());
            tx.execute(
                "INSERT INTO tasks(title, description, completed, owner_id, created_at, updated_at) \
                 VALUES (?1, ?2, 0, ?3, ?4, ?4)",
                params![title, description, owner, now],
            )?;
            let task_id = tx.last_insert_rowid();

            if let Some(ids) = category_ids {
                insert_links(&tx, task_id, ids)?;
            }

            let task = task_scoped(&tx, owner, task_id)?.ok_or(TodoError::NotFound)?;
            let categories = categories_for_task(&tx, task_id)?;
            tx.commit()?;

            Ok(TaskWithCategories { task, categories })
        })
    }

    /// Partial update. Absent patch fields are left untouched; a present
    /// `category_ids` (even empty) fully replaces the link set, while `None`
    /// leaves existing links alone. `updated_at` is refreshed on every
    /// successful update.
    pub fn update_task(
        &self,
        owner: &str,
        task_id: i64,
        patch: &TaskPatch,
        category_ids: Option<&[i64]>,
    ) -> Result<TaskWithCategories, TodoError> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(TodoError::ValidationError("Title is required".to_string()));
        }

        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;

            // Scoped read doubles as the ownership check; absent and
            // not-yours both come back as NotFound.
            let current = task_scoped(&tx, owner, task_id)?.ok_or(TodoError::NotFound)?;

            let title = match &patch.title {
                Some(title) => title.trim().to_string(),
                None => current.title,
            };
            let description = match &patch.description {
                Some(description) => description.clone(),
                None => current.description,
            };
            let completed = patch.completed.unwrap_or(current.completed);

            tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4 \
                 WHERE id = ?5 AND owner_id = ?6",
                params![
                    title,
                    description,
                    completed,
                    format_timestamp(&Utc::now()),
                    task_id,
                    owner
                ],
            )?;

            if let Some(ids) = category_ids {
                ensure_categories_owned(&tx, owner, ids)?;
                tx.execute(
                    "DELETE FROM task_categories WHERE task_id = ?1",
                    params![task_id],
                )?;
                insert_links(&tx, task_id, ids)?;
            }

            let task = task_scoped(&tx, owner, task_id)?.ok_or(TodoError::NotFound)?;
            let categories = categories_for_task(&tx, task_id)?;
            tx.commit()?;

            Ok(TaskWithCategories { task, categories })
        })
    }

    /// Delete a task and its links. Ownership is confirmed before any link
    /// is touched, so an id collision against another user's task has no
    /// effect at all.
    pub fn delete_task(&self, owner: &str, task_id: i64) -> Result<(), TodoError> {
        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;

            if task_scoped(&tx, owner, task_id)?.is_none() {
                return Err(TodoError::NotFound);
            }

            tx.execute(
                "DELETE FROM task_categories WHERE task_id = ?1",
                params![task_id],
            )?;
            tx.execute(
                "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
                params![task_id, owner],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn list_categories(&self, owner: &str) -> Result<Vec<Category>, TodoError> {
        self.store.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, color, owner_id, created_at FROM categories \
                 WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let categories = stmt
                .query_map(params![owner], category_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
    }

    pub fn create_category(
        &self,
        owner: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<Category, TodoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TodoError::ValidationError(
                "Category name is required".to_string(),
            ));
        }
        let color = color.unwrap_or(DEFAULT_CATEGORY_COLOR);

        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT INTO categories(name, color, owner_id, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, color, owner, format_timestamp(&Utc::now())],
            )?;
            let id = conn.last_insert_rowid();
            category_scoped(conn, owner, id)?.ok_or(TodoError::NotFound)
        })
    }

    pub fn update_category(
        &self,
        owner: &str,
        category_id: i64,
        patch: &CategoryPatch,
    ) -> Result<Category, TodoError> {
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(TodoError::ValidationError(
                "Category name is required".to_string(),
            ));
        }

        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;

            let current = category_scoped(&tx, owner, category_id)?.ok_or(TodoError::NotFound)?;
            let name = match &patch.name {
                Some(name) => name.trim().to_string(),
                None => current.name,
            };
            let color = patch.color.clone().unwrap_or(current.color);

            tx.execute(
                "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3 AND owner_id = ?4",
                params![name, color, category_id, owner],
            )?;

            let category = category_scoped(&tx, owner, category_id)?.ok_or(TodoError::NotFound)?;
            tx.commit()?;
            Ok(category)
        })
    }

    /// Delete a category and its links. Link removal happens only after the
    /// caller's ownership of the category is confirmed, and since links are
    /// never created across owners, it can never touch another user's tasks.
    pub fn delete_category(&self, owner: &str, category_id: i64) -> Result<(), TodoError> {
        self.store.with_conn(|conn| {
            let tx = conn.transaction()?;

            if category_scoped(&tx, owner, category_id)?.is_none() {
                return Err(TodoError::NotFound);
            }

            tx.execute(
                "DELETE FROM task_categories WHERE category_id = ?1",
                params![category_id],
            )?;
            tx.execute(
                "DELETE FROM categories WHERE id = ?1 AND owner_id = ?2",
                params![category_id, owner],
            )?;
            tx.commit()?;
            Ok(())
        })
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        owner_id: row.get(4)?,
        created_at: timestamp_from_column(row, 5)?,
        updated_at: timestamp_from_column(row, 6)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: timestamp_from_column(row, 4)?,
    })
}

fn task_scoped(conn: &Connection, owner: &str, task_id: i64) -> Result<Option<Task>, TodoError> {
    conn.query_row(
        "SELECT id, title, description, completed, owner_id, created_at, updated_at \
         FROM tasks WHERE id = ?1 AND owner_id = ?2",
        params![task_id, owner],
        task_from_row,
    )
    .optional()
    .map_err(TodoError::from)
}

fn category_scoped(
    conn: &Connection,
    owner: &str,
    category_id: i64,
) -> Result<Option<Category>, TodoError> {
    conn.query_row(
        "SELECT id, name, color, owner_id, created_at \
         FROM categories WHERE id = ?1 AND owner_id = ?2",
        params![category_id, owner],
        category_from_row,
    )
    .optional()
    .map_err(TodoError::from)
}

fn categories_for_task(conn: &Connection, task_id: i64) -> Result<Vec<CategoryRef>, TodoError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.color FROM task_categories tc \
         INNER JOIN categories c ON c.id = tc.category_id \
         WHERE tc.task_id = ?1 ORDER BY c.id",
    )?;
    let refs = stmt
        .query_map(params![task_id], |row| {
            Ok(CategoryRef {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(refs)
}

/// Every supplied category id must exist and belong to the caller; a miss
/// fails the whole operation with NotFound before any link is written.
fn ensure_categories_owned(conn: &Connection, owner: &str, ids: &[i64]) -> Result<(), TodoError> {
    for id in ids {
        let owned: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM categories WHERE id = ?1 AND owner_id = ?2",
                params![id, owner],
                |row| row.get(0),
            )
            .optional()?;
        if owned.is_none() {
            return Err(TodoError::NotFound);
        }
    }
    Ok(())
}

fn insert_links(conn: &Connection, task_id: i64, ids: &[i64]) -> Result<(), TodoError> {
    for id in ids {
        conn.execute(
            "INSERT OR IGNORE INTO task_categories(task_id, category_id) VALUES (?1, ?2)",
            params![task_id, id],
        )?;
    }
    Ok(())
}
