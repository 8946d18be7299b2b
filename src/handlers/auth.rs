//! Login endpoints.
//!
//! - POST /api/auth/main-admin/login
//! - POST /api/auth/shop-admin/login
//!
//! Both take `{ "username": ..., "password": ... }` and answer with
//! `{ "token": ..., "user": ... }`. Any credential failure is a 401 with the same body.

use axum::{Json, extract::State};

use crate::{
    auth::principal::PrincipalKind,
    error::AppError,
    models::admin::{LoginRequest, LoginResponse},
    services::auth_service,
    state::AppState,
};

pub async fn main_admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = auth_service::login(
        state.directory.as_ref(),
        &state.tokens,
        PrincipalKind::MainAdmin,
        request,
    )
    .await?;

    Ok(Json(response))
}

/// The returned user carries `coffee_shop_id`, the only shop the token can act on.
pub async fn shop_admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = auth_service::login(
        state.directory.as_ref(),
        &state.tokens,
        PrincipalKind::ShopAdmin,
        request,
    )
    .await?;

    Ok(Json(response))
}
