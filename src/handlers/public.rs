//! Public, unauthenticated endpoints. The tenant comes from the request host.
//!
//! - GET /api/public/menu
//! - GET /api/public/shop
//! - GET /api/public/categories

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::{category::Category, coffee_shop::CoffeeShop, menu_item::MenuItemResponse},
    services::{category_service, menu_service, shop_service},
    state::{AppState, ResolvedTenant},
};

/// Available items of the tenant's active shops, ordered for display.
///
/// # Response
///
/// - **200 OK**: list of items, each with a nested `category`
/// - **400**: host did not resolve to an active tenant
pub async fn menu(
    State(state): State<AppState>,
    ResolvedTenant(tenant): ResolvedTenant,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    Ok(Json(menu_service::public_menu(&state.pool, tenant.id).await?))
}

pub async fn shop(
    State(state): State<AppState>,
    ResolvedTenant(tenant): ResolvedTenant,
) -> Result<Json<CoffeeShop>, AppError> {
    Ok(Json(shop_service::public_shop(&state.pool, tenant.id).await?))
}

/// Categories are shared across tenants, so no tenant is required here.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(category_service::list_active_categories(&state.pool).await?))
}
