//! Shop admins editing their own shop profile.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::coffee_shop::{CoffeeShop, UpdateCoffeeShopRequest},
    services::shop_service,
    state::{AppState, ShopAdminSession},
};

pub async fn get_settings(
    State(state): State<AppState>,
    session: ShopAdminSession,
) -> Result<Json<CoffeeShop>, AppError> {
    Ok(Json(
        shop_service::find_shop(&state.pool, session.shop_id()).await?,
    ))
}

/// Shop admins may edit the profile but not (de)activate their own shop.
pub async fn update_settings(
    State(state): State<AppState>,
    session: ShopAdminSession,
    Json(mut request): Json<UpdateCoffeeShopRequest>,
) -> Result<Json<CoffeeShop>, AppError> {
    request.is_active = None;

    Ok(Json(
        shop_service::update_shop(&state.pool, session.shop_id(), request).await?,
    ))
}
