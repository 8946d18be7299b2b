//! Category management (main admin only), plus the read-only listing shop admins
//! use while editing their menu.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    services::category_service,
    state::{AppState, MainAdminSession, ShopAdminSession},
};

/// `GET /api/admin/categories`: every category, active or not.
pub async fn list_categories(
    State(state): State<AppState>,
    _session: MainAdminSession,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(category_service::list_all_categories(&state.pool).await?))
}

/// `POST /api/admin/categories`
///
/// ```json
/// { "name": "cold_bar", "display_name": "Cold Bar", "emoji": "🧊", "order_index": 3 }
/// ```
pub async fn create_category(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = category_service::create_category(&state.pool, request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(category_id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        category_service::get_category(&state.pool, category_id).await?,
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(category_id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(
        category_service::update_category(&state.pool, category_id, request).await?,
    ))
}

/// 409 while menu items still use the category.
pub async fn delete_category(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(category_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    category_service::delete_category(&state.pool, category_id).await?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

/// `GET /api/admin/menu/categories`: active categories for the shop admin's menu editor.
pub async fn shop_categories(
    State(state): State<AppState>,
    _session: ShopAdminSession,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(category_service::list_active_categories(&state.pool).await?))
}
