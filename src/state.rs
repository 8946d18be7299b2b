//! Shared application state and the per-request authorization scope.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::token::{Claims, MainAdminClaims, ShopAdminClaims, TokenService},
    db::DbPool,
    error::AppError,
    middleware::rate_limit::ClientRateLimiter,
    models::tenant::Tenant,
    services::directory::SharedDirectory,
};

/// Everything handlers and middleware need, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub directory: SharedDirectory,
    pub tokens: Arc<TokenService>,
    pub rate_limiter: Arc<ClientRateLimiter>,
}

/// What the authorization pipeline learned about the current request.
///
/// Lives in the request extensions. The tenant stage fills `host_subdomain` and
/// `tenant`, the authentication stage fills `claims`; nothing else writes to it.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    /// Subdomain named by the host, whether or not it matched an active tenant
    pub host_subdomain: Option<String>,
    pub tenant: Option<Tenant>,
    pub claims: Option<Claims>,
}

impl RequestScope {
    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant.as_ref().map(|t| t.id)
    }

    pub fn shop_id(&self) -> Option<i64> {
        self.claims.as_ref().and_then(Claims::shop_id)
    }
}

fn scope(parts: &Parts) -> RequestScope {
    parts
        .extensions
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_default()
}

/// The tenant resolved from the request host. Rejects with 400 when there is none.
#[derive(Debug, Clone)]
pub struct ResolvedTenant(pub Tenant);

impl<S: Send + Sync> FromRequestParts<S> for ResolvedTenant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        scope(parts)
            .tenant
            .map(ResolvedTenant)
            .ok_or(AppError::TenantNotResolved)
    }
}

/// Claims of an authenticated main admin.
#[derive(Debug, Clone)]
pub struct MainAdminSession(pub MainAdminClaims);

impl<S: Send + Sync> FromRequestParts<S> for MainAdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match scope(parts).claims {
            Some(Claims::MainAdmin(claims)) => Ok(MainAdminSession(claims)),
            Some(Claims::ShopAdmin(_)) => {
                Err(AppError::Forbidden("Main admin access required".into()))
            }
            None => Err(AppError::MissingAuthorization),
        }
    }
}

/// Claims of an authenticated shop admin. `shop_id` here is the only shop the
/// request may touch.
#[derive(Debug, Clone)]
pub struct ShopAdminSession(pub ShopAdminClaims);

impl ShopAdminSession {
    pub fn shop_id(&self) -> i64 {
        self.0.shop_id
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ShopAdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match scope(parts).claims {
            Some(Claims::ShopAdmin(claims)) => Ok(ShopAdminSession(claims)),
            Some(Claims::MainAdmin(_)) => {
                Err(AppError::Forbidden("Shop admin access required".into()))
            }
            None => Err(AppError::MissingAuthorization),
        }
    }
}
