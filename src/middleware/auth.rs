//! Session token authentication and role gates.
//!
//! A protected request goes through these stages in order, each of which may reject:
//!
//! 1. Bearer extraction: `Authorization: Bearer <token>` must be present (401)
//! 2. Token verification: signature and expiry (401, one message for every cause)
//! 3. Claim projection: verified claims are stored in the [`RequestScope`]
//! 4. Role gate: the route's principal kind must match exactly (403)
//! 5. Shop scope (shop-admin routes): the token's shop must belong to the tenant
//!    named by the host; a host naming no active tenant is refused (403)
//!
//! Each stage is a plain function so the router can compose them per route group.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{
        principal::PrincipalKind,
        token::{Claims, TokenService},
    },
    error::AppError,
    services::directory::Directory,
    state::{AppState, RequestScope},
};

/// Stage 1: pull the bearer token out of the headers.
///
/// A missing header and a header with another scheme fail with different errors.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingAuthorization)?;

    let token = value
        .to_str()
        .map_err(|_| AppError::InvalidAuthorizationScheme)?
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidAuthorizationScheme)?
        .trim();

    if token.is_empty() {
        return Err(AppError::InvalidAuthorizationScheme);
    }
    Ok(token)
}

/// Stage 2: verify the token. The cause of a failure is logged but not returned.
pub fn verify_token(tokens: &TokenService, token: &str) -> Result<Claims, AppError> {
    tokens.verify(token).map_err(|err| {
        tracing::debug!(error = %err, "token rejected");
        AppError::InvalidToken
    })
}

/// Stage 4: the authenticated principal must be exactly `required`.
pub fn require_kind(scope: &RequestScope, required: PrincipalKind) -> Result<(), AppError> {
    let claims = scope.claims.as_ref().ok_or(AppError::MissingAuthorization)?;

    if claims.kind() == required {
        return Ok(());
    }

    tracing::debug!(
        principal_id = claims.principal_id(),
        kind = %claims.kind(),
        required = %required,
        "role mismatch"
    );
    Err(AppError::Forbidden(match required {
        PrincipalKind::MainAdmin => "Main admin access required".into(),
        PrincipalKind::ShopAdmin => "Shop admin access required".into(),
    }))
}

/// Stage 5: a shop admin may only act through a host belonging to its own tenant.
///
/// Hosts without a subdomain candidate (local development hosts) pass. A host that
/// names a subdomain which is unknown or inactive is refused, as is a tenant that
/// does not own the shop in the claims.
pub async fn check_shop_scope(directory: &dyn Directory, scope: &RequestScope) -> Result<(), AppError> {
    let Some(shop_id) = scope.shop_id() else {
        return Ok(());
    };

    let tenant_id = match (scope.tenant_id(), scope.host_subdomain.as_deref()) {
        (Some(tenant_id), _) => tenant_id,
        (None, None) => return Ok(()),
        (None, Some(subdomain)) => {
            tracing::debug!(shop_id, subdomain, "shop admin on unresolved tenant host");
            return Err(AppError::Forbidden(
                "Shop does not belong to this tenant".into(),
            ));
        }
    };

    match directory.shop_tenant_id(shop_id).await? {
        Some(owner) if owner == tenant_id => Ok(()),
        owner => {
            tracing::debug!(shop_id, tenant_id, ?owner, "shop outside resolved tenant");
            Err(AppError::Forbidden(
                "Shop does not belong to this tenant".into(),
            ))
        }
    }
}

/// Stages 1–3 as middleware.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).inspect_err(|err| {
        tracing::debug!(code = err.code(), "authorization header rejected");
    })?;
    let claims = verify_token(&state.tokens, token)?;

    let mut scope = request
        .extensions_mut()
        .remove::<RequestScope>()
        .unwrap_or_default();
    scope.claims = Some(claims);
    request.extensions_mut().insert(scope);

    Ok(next.run(request).await)
}

fn current_scope(request: &Request) -> RequestScope {
    request
        .extensions()
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_default()
}

pub async fn require_main_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_kind(&current_scope(&request), PrincipalKind::MainAdmin)?;
    Ok(next.run(request).await)
}

pub async fn require_shop_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_kind(&current_scope(&request), PrincipalKind::ShopAdmin)?;
    Ok(next.run(request).await)
}

pub async fn enforce_shop_scope(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_shop_scope(state.directory.as_ref(), &current_scope(&request)).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;

    use super::*;
    use crate::{
        auth::principal::fixtures::{main_admin, shop_admin},
        models::tenant::Tenant,
        services::directory::memory::MemoryDirectory,
    };

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    fn tenant(id: i64) -> Tenant {
        Tenant {
            id,
            subdomain: "demo".into(),
            name: "Demo".into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn bearer_token_accepts_bearer_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_and_wrong_scheme_differ() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::MissingAuthorization)
        ));
        assert!(matches!(
            bearer_token(&headers("Token abc")),
            Err(AppError::InvalidAuthorizationScheme)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer   ")),
            Err(AppError::InvalidAuthorizationScheme)
        ));
    }

    #[test]
    fn verify_token_collapses_failures() {
        let tokens = TokenService::new("secret", 1);
        let foreign = TokenService::new("other", 1)
            .issue(&main_admin(1, "admin", "x"))
            .unwrap();

        assert!(matches!(verify_token(&tokens, "junk"), Err(AppError::InvalidToken)));
        assert!(matches!(verify_token(&tokens, &foreign), Err(AppError::InvalidToken)));
    }

    #[test]
    fn role_gate_has_no_hierarchy() {
        let tokens = TokenService::new("secret", 1);
        let now = Utc::now();
        let main = Claims::for_principal(&main_admin(1, "admin", "x"), now, tokens.ttl()).unwrap();
        let shop =
            Claims::for_principal(&shop_admin(2, "barista", 7, "x"), now, tokens.ttl()).unwrap();

        let as_main = RequestScope { claims: Some(main), ..Default::default() };
        let as_shop = RequestScope { claims: Some(shop), ..Default::default() };

        assert!(require_kind(&as_main, PrincipalKind::MainAdmin).is_ok());
        assert!(require_kind(&as_shop, PrincipalKind::ShopAdmin).is_ok());
        assert!(matches!(
            require_kind(&as_shop, PrincipalKind::MainAdmin),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_kind(&as_main, PrincipalKind::ShopAdmin),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_kind(&RequestScope::default(), PrincipalKind::MainAdmin),
            Err(AppError::MissingAuthorization)
        ));
    }

    #[tokio::test]
    async fn shop_scope_checks_tenant_ownership() {
        let directory = MemoryDirectory::default().with_shop(7, 1).with_shop(8, 2);
        let claims = Claims::for_principal(
            &shop_admin(2, "barista", 7, "x"),
            Utc::now(),
            chrono::Duration::hours(1),
        )
        .unwrap();

        let own = RequestScope {
            host_subdomain: Some("demo".into()),
            tenant: Some(tenant(1)),
            claims: Some(claims.clone()),
        };
        let foreign = RequestScope {
            host_subdomain: Some("demo".into()),
            tenant: Some(tenant(2)),
            claims: Some(claims.clone()),
        };
        let local = RequestScope { claims: Some(claims.clone()), ..Default::default() };
        let unresolved = RequestScope {
            host_subdomain: Some("nosuch".into()),
            tenant: None,
            claims: Some(claims),
        };

        assert!(check_shop_scope(&directory, &own).await.is_ok());
        assert!(check_shop_scope(&directory, &local).await.is_ok());
        assert!(matches!(
            check_shop_scope(&directory, &foreign).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            check_shop_scope(&directory, &unresolved).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
