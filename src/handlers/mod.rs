//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, path params, typed session extractors)
//! 2. Calls into `services`
//! 3. Returns HTTP response (JSON, status code)

/// Login endpoints
pub mod auth;
pub mod categories;
pub mod health;
pub mod menu;
/// Tenant-scoped public endpoints
pub mod public;
pub mod settings;
pub mod shops;
pub mod tenants;
