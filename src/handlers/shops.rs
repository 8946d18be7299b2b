//! Coffee shop and shop admin management (main admin only).
//!
//! - GET/POST /api/admin/tenants/{tenant_id}/shops
//! - GET/PUT/DELETE /api/admin/shops/{id}
//! - POST /api/admin/shops/{shop_id}/admins

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::{
        admin::{CreateShopAdminRequest, ShopAdmin},
        coffee_shop::{CoffeeShop, CreateCoffeeShopRequest, ShopDetails, UpdateCoffeeShopRequest},
    },
    services::{shop_service, tenant_service},
    state::{AppState, MainAdminSession},
};

/// Shops of one tenant. 404 when the tenant does not exist.
pub async fn list_shops(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(tenant_id): Path<i64>,
) -> Result<Json<Vec<CoffeeShop>>, AppError> {
    tenant_service::find_tenant(&state.pool, tenant_id)
        .await?
        .ok_or(AppError::NotFound("Tenant"))?;

    Ok(Json(shop_service::list_shops(&state.pool, tenant_id).await?))
}

/// Create a shop under a tenant.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Demo Coffee Shop",
///   "location": "Tehran, Iran",
///   "instagram_url": "https://instagram.com/democoffee"
/// }
/// ```
pub async fn create_shop(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(tenant_id): Path<i64>,
    Json(request): Json<CreateCoffeeShopRequest>,
) -> Result<(StatusCode, Json<CoffeeShop>), AppError> {
    let shop = shop_service::create_shop(&state.pool, tenant_id, request).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

/// Shop with its tenant and admins (password hashes are never serialized).
pub async fn get_shop(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(shop_id): Path<i64>,
) -> Result<Json<ShopDetails>, AppError> {
    Ok(Json(shop_service::get_shop_details(&state.pool, shop_id).await?))
}

pub async fn update_shop(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(shop_id): Path<i64>,
    Json(request): Json<UpdateCoffeeShopRequest>,
) -> Result<Json<CoffeeShop>, AppError> {
    Ok(Json(
        shop_service::update_shop(&state.pool, shop_id, request).await?,
    ))
}

pub async fn delete_shop(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(shop_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    shop_service::delete_shop(&state.pool, shop_id).await?;
    Ok(Json(json!({ "message": "Coffee shop deleted successfully" })))
}

/// Create an admin for a shop.
///
/// # Response
///
/// - **201 Created**: the admin, without its password hash
/// - **404**: shop does not exist
/// - **409**: username taken
pub async fn create_shop_admin(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(shop_id): Path<i64>,
    Json(request): Json<CreateShopAdminRequest>,
) -> Result<(StatusCode, Json<ShopAdmin>), AppError> {
    let admin = shop_service::create_shop_admin(&state.pool, shop_id, request).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}
