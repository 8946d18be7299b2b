//! HTTP middleware components.
//!
//! The guards below wire the individual stages onto a route group. `route_layer`
//! wraps what came before it, so the last layer listed runs first.

use std::any::Any;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Session token authentication and role gates
pub mod auth;
/// Per-client request throttling
pub mod rate_limit;
/// Host-based tenant resolution
pub mod tenant;

/// Public routes: tenant resolution only.
pub fn with_tenant(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state.clone(), tenant::resolve_tenant))
}

/// Platform routes: authenticate, then require a main admin.
pub fn main_admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn(auth::require_main_admin))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
}

/// Shop routes: resolve tenant, authenticate, require a shop admin, check shop scope.
pub fn shop_admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), auth::enforce_shop_scope))
        .route_layer(from_fn(auth::require_shop_admin))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .route_layer(from_fn_with_state(state.clone(), tenant::resolve_tenant))
}

/// Response for a handler that panicked: logged, answered as a plain 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::{Router, body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        auth::token::TokenService,
        services::directory::{Directory, memory::MemoryDirectory},
        state::AppState,
    };

    pub const SECRET: &str = "pipeline-secret";

    /// State with a pool that never connects; fine as long as no handler queries it.
    pub fn state(directory: MemoryDirectory) -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/never_used")
            .unwrap();
        AppState {
            pool,
            directory: Arc::new(directory) as Arc<dyn Directory>,
            tokens: Arc::new(TokenService::new(SECRET, 24)),
            rate_limiter: super::rate_limit::client_rate_limiter(1_000),
        }
    }

    pub async fn send(app: Router, host: &str, authorization: Option<&str>, uri: &str) -> Response {
        let mut builder = Request::builder().uri(uri).header("host", host);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, http::StatusCode, routing::get};
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::testing::{SECRET, json, send, state};
    use super::*;
    use crate::{
        auth::{
            principal::fixtures::{main_admin, shop_admin},
            token::TokenService,
        },
        services::directory::memory::MemoryDirectory,
        state::{MainAdminSession, ResolvedTenant, ShopAdminSession},
    };

    async fn platform_echo(MainAdminSession(claims): MainAdminSession) -> Json<serde_json::Value> {
        Json(json!({ "username": claims.username }))
    }

    async fn shop_echo(session: ShopAdminSession) -> Json<serde_json::Value> {
        Json(json!({ "shop_id": session.shop_id() }))
    }

    async fn public_echo(ResolvedTenant(tenant): ResolvedTenant) -> Json<serde_json::Value> {
        Json(json!({ "tenant": tenant.subdomain }))
    }

    fn app() -> Router {
        let directory = MemoryDirectory::default()
            .with_tenant(1, "demo", true)
            .with_tenant(2, "rival", true)
            .with_shop(7, 1);
        let state = state(directory);

        let public = with_tenant(Router::new().route("/public", get(public_echo)), &state);
        let platform = main_admin_only(Router::new().route("/platform", get(platform_echo)), &state);
        let shop = shop_admin_only(Router::new().route("/shop", get(shop_echo)), &state);

        Router::new()
            .merge(public)
            .merge(platform)
            .merge(shop)
            .with_state(state)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn tokens() -> TokenService {
        TokenService::new(SECRET, 24)
    }

    #[tokio::test]
    async fn main_admin_reaches_platform_route() {
        let token = tokens().issue(&main_admin(1, "admin", "x")).unwrap();
        let res = send(app(), "localhost:8080", Some(&bearer(&token)), "/platform").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await["username"], "admin");
    }

    #[tokio::test]
    async fn shop_admin_on_platform_route_is_forbidden() {
        let token = tokens().issue(&shop_admin(2, "barista", 7, "x")).unwrap();
        let res = send(app(), "localhost:8080", Some(&bearer(&token)), "/platform").await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(res).await["error"]["code"], "forbidden");
    }

    #[tokio::test]
    async fn main_admin_on_shop_route_is_forbidden() {
        let token = tokens().issue(&main_admin(1, "admin", "x")).unwrap();
        let res = send(app(), "demo.example.com", Some(&bearer(&token)), "/shop").await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_and_wrong_scheme_are_both_unauthorized_but_distinct() {
        let missing = send(app(), "localhost", None, "/platform").await;
        let wrong = send(app(), "localhost", Some("Token abc"), "/platform").await;

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(missing).await["error"]["code"], "missing_authorization");
        assert_eq!(json(wrong).await["error"]["code"], "invalid_authorization");
    }

    #[tokio::test]
    async fn expired_and_forged_tokens_look_the_same() {
        let stale = tokens()
            .issue_at(&main_admin(1, "admin", "x"), Utc::now() - Duration::hours(25))
            .unwrap();
        let forged = TokenService::new("not-the-secret", 24)
            .issue(&main_admin(1, "admin", "x"))
            .unwrap();

        let stale = json(send(app(), "localhost", Some(&bearer(&stale)), "/platform").await).await;
        let forged = json(send(app(), "localhost", Some(&bearer(&forged)), "/platform").await).await;

        assert_eq!(stale, forged);
        assert_eq!(stale["error"]["code"], "invalid_token");
    }

    #[tokio::test]
    async fn shop_admin_uses_claimed_shop_under_own_tenant() {
        let token = tokens().issue(&shop_admin(2, "barista", 7, "x")).unwrap();
        let res = send(app(), "demo.example.com", Some(&bearer(&token)), "/shop").await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await["shop_id"], 7);
    }

    #[tokio::test]
    async fn shop_admin_without_tenant_host_still_passes() {
        let token = tokens().issue(&shop_admin(2, "barista", 7, "x")).unwrap();
        let res = send(app(), "127.0.0.1:8080", Some(&bearer(&token)), "/shop").await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn shop_admin_under_foreign_tenant_is_forbidden() {
        let token = tokens().issue(&shop_admin(2, "barista", 7, "x")).unwrap();
        let res = send(app(), "rival.example.com", Some(&bearer(&token)), "/shop").await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn shop_admin_on_unknown_tenant_host_is_forbidden() {
        let token = tokens().issue(&shop_admin(2, "barista", 7, "x")).unwrap();

        for host in ["nosuch.example.com", "DEMO.example.com"] {
            let res = send(app(), host, Some(&bearer(&token)), "/shop").await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "{host}");
        }
    }

    #[tokio::test]
    async fn public_route_needs_a_tenant_only_when_it_asks_for_one() {
        let ok = send(app(), "demo.example.com", None, "/public").await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(json(ok).await["tenant"], "demo");

        let none = send(app(), "example", None, "/public").await;
        assert_eq!(none.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(none).await["error"]["code"], "tenant_not_found");
    }
}
