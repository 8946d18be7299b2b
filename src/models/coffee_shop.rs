//! Coffee shop data models.
//!
//! A shop belongs to exactly one tenant for its whole life. Its numeric id is the
//! unit of authorization for shop admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{admin::ShopAdmin, tenant::Tenant};

/// Represents a coffee shop record from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CoffeeShop {
    pub id: i64,

    /// Owning tenant, immutable after creation
    pub tenant_id: i64,

    pub name: String,
    pub location: String,
    pub phone: String,
    pub instagram_url: String,
    pub logo_url: String,
    pub hero_image_url: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a shop under a tenant.
///
/// Only `name` is required; missing profile fields are stored as empty strings.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoffeeShopRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(url)]
    pub instagram_url: Option<String>,

    #[validate(url)]
    pub logo_url: Option<String>,

    #[validate(url)]
    pub hero_image_url: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Partial update of a shop profile. Used both by the platform admin and by the
/// shop's own admin (`PUT /api/admin/settings`).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCoffeeShopRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(url)]
    pub instagram_url: Option<String>,

    #[validate(url)]
    pub logo_url: Option<String>,

    #[validate(url)]
    pub hero_image_url: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}

/// Shop with its tenant and admins, returned by `GET /api/admin/shops/{id}`.
#[derive(Debug, Serialize)]
pub struct ShopDetails {
    #[serde(flatten)]
    pub shop: CoffeeShop,

    pub tenant: Tenant,
    pub admins: Vec<ShopAdmin>,
}
