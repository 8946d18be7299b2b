//! HTTP route table.
//!
//! Routes are grouped by the guard they need; see [`crate::middleware`] for the
//! order the stages run in.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, middleware, state::AppState};

pub fn router(state: AppState) -> Router {
    let public = middleware::with_tenant(
        Router::new()
            .route("/api/public/menu", get(handlers::public::menu))
            .route("/api/public/shop", get(handlers::public::shop))
            .route("/api/public/categories", get(handlers::public::categories)),
        &state,
    );

    let login = Router::new()
        .route(
            "/api/auth/main-admin/login",
            post(handlers::auth::main_admin_login),
        )
        .route(
            "/api/auth/shop-admin/login",
            post(handlers::auth::shop_admin_login),
        );

    let platform = middleware::main_admin_only(
        Router::new()
            // Tenants
            .route(
                "/api/admin/tenants",
                get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant),
            )
            .route(
                "/api/admin/tenants/{id}",
                get(handlers::tenants::get_tenant)
                    .put(handlers::tenants::update_tenant)
                    .delete(handlers::tenants::delete_tenant),
            )
            // Coffee shops
            .route(
                "/api/admin/tenants/{tenant_id}/shops",
                get(handlers::shops::list_shops).post(handlers::shops::create_shop),
            )
            .route(
                "/api/admin/shops/{id}",
                get(handlers::shops::get_shop)
                    .put(handlers::shops::update_shop)
                    .delete(handlers::shops::delete_shop),
            )
            .route(
                "/api/admin/shops/{shop_id}/admins",
                post(handlers::shops::create_shop_admin),
            )
            // Categories
            .route(
                "/api/admin/categories",
                get(handlers::categories::list_categories)
                    .post(handlers::categories::create_category),
            )
            .route(
                "/api/admin/categories/{id}",
                get(handlers::categories::get_category)
                    .put(handlers::categories::update_category)
                    .delete(handlers::categories::delete_category),
            ),
        &state,
    );

    let shop = middleware::shop_admin_only(
        Router::new()
            .route(
                "/api/admin/menu",
                get(handlers::menu::list_items).post(handlers::menu::create_item),
            )
            .route(
                "/api/admin/menu/categories",
                get(handlers::categories::shop_categories),
            )
            .route(
                "/api/admin/menu/{id}",
                get(handlers::menu::get_item)
                    .put(handlers::menu::update_item)
                    .delete(handlers::menu::delete_item),
            )
            .route(
                "/api/admin/settings",
                get(handlers::settings::get_settings).put(handlers::settings::update_settings),
            ),
        &state,
    );

    let routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(public)
        .merge(login)
        .merge(platform)
        .merge(shop);

    with_service_layers(routes, state)
}

/// Layers every request passes through, outermost last: CORS, tracing, panic
/// recovery, then per-client rate limiting.
fn with_service_layers(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit::limit_by_client,
        ))
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
