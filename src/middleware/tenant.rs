//! Tenant resolution middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    state::{AppState, RequestScope},
    tenancy,
};

/// Resolve the tenant from the host and record it in the [`RequestScope`].
///
/// Never rejects for an unknown host; handlers that need a tenant extract
/// `ResolvedTenant` and fail there.
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = tenancy::request_host(request.headers(), request.uri());
    let host_subdomain = host.and_then(tenancy::candidate_subdomain).map(str::to_owned);
    let tenant = tenancy::resolve(state.directory.as_ref(), host).await?;

    let mut scope = request
        .extensions_mut()
        .remove::<RequestScope>()
        .unwrap_or_default();
    scope.host_subdomain = host_subdomain;
    scope.tenant = tenant;
    request.extensions_mut().insert(scope);

    Ok(next.run(request).await)
}
