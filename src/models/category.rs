//! Menu categories.
//!
//! Categories are managed by the platform admin and shared by every shop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Category {
    pub id: i64,

    /// Unique machine name (e.g. `cold_bar`)
    pub name: String,

    /// Name shown on the menu
    pub display_name: String,

    pub emoji: String,
    pub color: String,
    pub order_index: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: String,

    #[validate(length(min = 2, max = 100))]
    pub display_name: String,

    #[serde(default)]
    #[validate(length(max = 10))]
    pub emoji: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub color: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub order_index: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub display_name: Option<String>,

    #[validate(length(max = 10))]
    pub emoji: Option<String>,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,

    pub is_active: Option<bool>,
}
