// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod jwt;
pub mod middleware;
mod password;
mod service;
mod store;
pub(crate) mod types;

pub use middleware::{AuthMiddlewareFactory, AuthRequest};
#[allow(unused_imports)]
pub use password::{hash_password, verify_password};
pub use service::IamService;
pub use store::UserStore;
pub use types::{IamError, User, UserRecord};
