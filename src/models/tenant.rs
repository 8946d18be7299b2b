//! Tenant data models and API request/response types.
//!
//! A tenant is a platform customer addressed by its subdomain
//! (`demo.example.com` → tenant `demo`). The subdomain is fixed at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::coffee_shop::CoffeeShop;

/// Represents a tenant record from the database.
///
/// # Database Table
///
/// Maps to the `tenants` table. Tenants are never physically removed; deactivation flips `is_active`
/// and deletion stamps `deleted_at`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Tenant {
    pub id: i64,

    /// Case-sensitive slug used as the first label of the host name
    pub subdomain: String,

    pub name: String,

    /// Inactive tenants are invisible to host-based resolution
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a tenant.
///
/// ```json
/// { "subdomain": "demo", "name": "Demo Coffee" }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 3, max = 50, message = "subdomain must be 3-50 characters"))]
    pub subdomain: String,

    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,
}

/// Request body for updating a tenant. The subdomain cannot be changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTenantRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: Option<String>,

    pub is_active: Option<bool>,
}

/// Tenant together with its shops, returned by `GET /api/admin/tenants/{id}`.
#[derive(Debug, Serialize)]
pub struct TenantDetails {
    #[serde(flatten)]
    pub tenant: Tenant,

    pub coffee_shops: Vec<CoffeeShop>,
}
