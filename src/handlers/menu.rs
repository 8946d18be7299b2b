//! Menu management for shop admins.
//!
//! The shop is never taken from the path or the body: every handler reads it from
//! the verified session, so an admin can only ever see and change its own menu.
//! Items belonging to other shops answer 404.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::menu_item::{CreateMenuItemRequest, MenuItem, MenuItemResponse, UpdateMenuItemRequest},
    services::menu_service,
    state::{AppState, ShopAdminSession},
};

pub async fn list_items(
    State(state): State<AppState>,
    session: ShopAdminSession,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    Ok(Json(
        menu_service::list_items(&state.pool, session.shop_id()).await?,
    ))
}

/// Create a menu item in the admin's shop.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Latte",
///   "category_id": 1,
///   "price": 42000,
///   "price_premium": 52000,
///   "has_dual_pricing": true
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the item
/// - **400**: validation failure or unknown category
pub async fn create_item(
    State(state): State<AppState>,
    session: ShopAdminSession,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    let item = menu_service::create_item(&state.pool, session.shop_id(), request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    session: ShopAdminSession,
    Path(item_id): Path<i64>,
) -> Result<Json<MenuItemResponse>, AppError> {
    Ok(Json(
        menu_service::get_item(&state.pool, session.shop_id(), item_id).await?,
    ))
}

pub async fn update_item(
    State(state): State<AppState>,
    session: ShopAdminSession,
    Path(item_id): Path<i64>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, AppError> {
    Ok(Json(
        menu_service::update_item(&state.pool, session.shop_id(), item_id, request).await?,
    ))
}

pub async fn delete_item(
    State(state): State<AppState>,
    session: ShopAdminSession,
    Path(item_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    menu_service::delete_item(&state.pool, session.shop_id(), item_id).await?;
    Ok(Json(json!({ "message": "Menu item deleted successfully" })))
}
