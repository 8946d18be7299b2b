//! Menu item data models and API request/response types.
//!
//! This module defines:
//! - `MenuItem`: Database entity owned by one coffee shop
//! - `MenuItemRow`: a menu item joined with its category, as read by list/get queries
//! - `MenuItemResponse`: what clients receive, with the category nested

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a menu item record from the database.
///
/// # Pricing
///
/// Prices are whole currency units. Items with `has_dual_pricing` carry a second
/// `price_premium` (e.g. a large size or premium beans).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MenuItem {
    pub id: i64,
    pub coffee_shop_id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: i32,
    pub price_premium: Option<i32>,
    pub has_dual_pricing: bool,
    pub image_url: String,
    pub order_index: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu item joined with the category columns it is displayed under.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuItemRow {
    #[sqlx(flatten)]
    pub item: MenuItem,

    pub category_name: String,
    pub category_display_name: String,
    pub category_emoji: String,
    pub category_color: String,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub emoji: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    #[serde(flatten)]
    pub item: MenuItem,

    pub category: CategorySummary,
}

impl From<MenuItemRow> for MenuItemResponse {
    fn from(row: MenuItemRow) -> Self {
        let category = CategorySummary {
            id: row.item.category_id,
            name: row.category_name,
            display_name: row.category_display_name,
            emoji: row.category_emoji,
            color: row.category_color,
        };
        Self {
            item: row.item,
            category,
        }
    }
}

/// Request body for `POST /api/admin/menu`.
///
/// ```json
/// {
///   "name": "Latte",
///   "category_id": 1,
///   "price": 120,
///   "price_premium": 150,
///   "has_dual_pricing": true
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    pub category_id: i64,

    #[validate(range(min = 0))]
    pub price: i32,

    #[validate(range(min = 0))]
    pub price_premium: Option<i32>,

    #[serde(default)]
    pub has_dual_pricing: bool,

    #[validate(url)]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub order_index: i32,

    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    pub category_id: Option<i64>,

    #[validate(range(min = 0))]
    pub price: Option<i32>,

    #[validate(range(min = 0))]
    pub price_premium: Option<i32>,

    pub has_dual_pricing: Option<bool>,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,

    pub is_available: Option<bool>,
}
