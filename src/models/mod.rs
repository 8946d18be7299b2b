//! Data models representing database entities and API payloads.

/// Main admin and shop admin accounts, login payloads
pub mod admin;
/// Shared menu categories
pub mod category;
/// Coffee shops owned by tenants
pub mod coffee_shop;
/// Per-shop menu items
pub mod menu_item;
/// Tenants addressed by subdomain
pub mod tenant;
