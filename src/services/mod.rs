//! Business logic services.
//!
//! Services own the SQL and the rules around it. Handlers stay thin and only
//! translate between HTTP and these functions.

pub mod auth_service;
pub mod category_service;
pub mod directory;
pub mod menu_service;
pub mod seed;
pub mod shop_service;
pub mod tenant_service;
