// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod api;
pub mod config;
pub mod iam;
pub mod store;
pub mod todo;
