//! Admin account models.
//!
//! Two separate tables back the two principal kinds. Usernames are unique per table,
//! so `admin` may exist both as a main admin and as a shop admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::principal::Principal;

/// Platform-wide administrator.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MainAdmin {
    pub id: i64,
    pub username: String,

    /// bcrypt hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrator of a single coffee shop.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ShopAdmin {
    pub id: i64,

    /// Shop this admin is bound to for its whole lifetime
    pub coffee_shop_id: i64,

    pub username: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShopAdminRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Login body shared by both login endpoints.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Keeps the password out of logs.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Principal,
}
