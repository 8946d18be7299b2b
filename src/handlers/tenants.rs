//! Tenant management (main admin only).
//!
//! - GET /api/admin/tenants
//! - POST /api/admin/tenants
//! - GET /api/admin/tenants/{id}
//! - PUT /api/admin/tenants/{id}
//! - DELETE /api/admin/tenants/{id}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::tenant::{CreateTenantRequest, Tenant, TenantDetails, UpdateTenantRequest},
    services::tenant_service,
    state::{AppState, MainAdminSession},
};

pub async fn list_tenants(
    State(state): State<AppState>,
    _session: MainAdminSession,
) -> Result<Json<Vec<Tenant>>, AppError> {
    Ok(Json(tenant_service::list_tenants(&state.pool).await?))
}

/// Create a tenant.
///
/// # Request Body
///
/// ```json
/// { "subdomain": "demo", "name": "Demo Coffee Shop" }
/// ```
///
/// # Response
///
/// - **201 Created**: the new tenant
/// - **400**: invalid or reserved subdomain
/// - **409**: subdomain already taken
pub async fn create_tenant(
    State(state): State<AppState>,
    MainAdminSession(claims): MainAdminSession,
    Json(request): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<Tenant>), AppError> {
    let tenant = tenant_service::create_tenant(&state.pool, request).await?;
    tracing::info!(admin = %claims.username, tenant_id = tenant.id, "tenant created by main admin");

    Ok((StatusCode::CREATED, Json(tenant)))
}

/// Tenant with its coffee shops.
pub async fn get_tenant(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(tenant_id): Path<i64>,
) -> Result<Json<TenantDetails>, AppError> {
    Ok(Json(tenant_service::get_tenant(&state.pool, tenant_id).await?))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(tenant_id): Path<i64>,
    Json(request): Json<UpdateTenantRequest>,
) -> Result<Json<Tenant>, AppError> {
    Ok(Json(
        tenant_service::update_tenant(&state.pool, tenant_id, request).await?,
    ))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    _session: MainAdminSession,
    Path(tenant_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    tenant_service::delete_tenant(&state.pool, tenant_id).await?;
    Ok(Json(json!({ "message": "Tenant deleted successfully" })))
}
