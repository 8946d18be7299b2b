//! Coffee Menu Server - Main Application Entry Point
//!
//! A multi-tenant REST API for coffee shop menus. Each tenant is addressed by the
//! subdomain of the request host; platform admins manage tenants, shops and
//! categories, and shop admins manage the menu of the single shop they are bound to.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: HS256 session tokens, bcrypt password hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. `--migrate` / `--seed` stop here; otherwise build the router
//! 5. Start server on configured port

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod tenancy;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    auth::token::TokenService, middleware::rate_limit::client_rate_limiter,
    services::directory::PgDirectory, state::AppState,
};

#[derive(Debug, Parser)]
#[command(name = "coffee_menu_server", version, about = "Multi-tenant coffee shop menu API")]
struct Cli {
    /// Run database migrations and exit
    #[arg(long)]
    migrate: bool,

    /// Seed the database with sample data and exit
    #[arg(long, conflicts_with = "migrate")]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(port = config.server_port, "Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if cli.migrate {
        return Ok(());
    }

    if cli.seed {
        services::seed::seed_database(&pool).await?;
        return Ok(());
    }

    let state = AppState {
        directory: Arc::new(PgDirectory::new(pool.clone())),
        tokens: Arc::new(TokenService::new(
            &config.jwt_secret,
            config.jwt_expire_hours,
        )),
        rate_limiter: client_rate_limiter(config.rate_limit_per_second),
        pool,
    };

    // Forget idle clients every minute
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            rate_limiter.retain_recent();
        }
    });

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses feed the per-client rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
