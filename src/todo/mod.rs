// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod service;
mod types;

pub use service::TodoService;
pub use types::{
    Category, CategoryPatch, CategoryRef, DEFAULT_CATEGORY_COLOR, Task, TaskPatch,
    TaskWithCategories, TodoError,
};
