//! Read-only lookups used by the authorization pipeline.
//!
//! The tenant resolver, the login handlers and the shop scope check only ever read
//! through [`Directory`]. Every call goes to the store; nothing is cached, so a
//! deactivated tenant or admin is refused on the very next request.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    auth::principal::{Principal, PrincipalKind},
    db::DbPool,
    error::AppError,
    models::{
        admin::{MainAdmin, ShopAdmin},
        tenant::Tenant,
    },
};

#[async_trait]
pub trait Directory: Send + Sync {
    /// Active, non-deleted tenant with exactly this subdomain.
    async fn active_tenant_by_subdomain(&self, subdomain: &str)
    -> Result<Option<Tenant>, AppError>;

    /// Active, non-deleted principal of `kind` with this username.
    async fn active_principal(
        &self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<Principal>, AppError>;

    /// Tenant owning the shop, if the shop exists.
    async fn shop_tenant_id(&self, shop_id: i64) -> Result<Option<i64>, AppError>;
}

pub type SharedDirectory = Arc<dyn Directory>;

/// [`Directory`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDirectory {
    pool: DbPool,
}

impl PgDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn active_tenant_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, subdomain, name, is_active, created_at, updated_at
            FROM tenants
            WHERE subdomain = $1 AND is_active = true AND deleted_at IS NULL
            "#,
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn active_principal(
        &self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<Principal>, AppError> {
        let principal = match kind {
            PrincipalKind::MainAdmin => sqlx::query_as::<_, MainAdmin>(
                r#"
                SELECT id, username, password_hash, is_active, created_at, updated_at
                FROM main_admins
                WHERE username = $1 AND is_active = true AND deleted_at IS NULL
                "#,
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(Principal::MainAdmin),
            PrincipalKind::ShopAdmin => sqlx::query_as::<_, ShopAdmin>(
                r#"
                SELECT id, coffee_shop_id, username, password_hash, is_active, created_at, updated_at
                FROM shop_admins
                WHERE username = $1 AND is_active = true AND deleted_at IS NULL
                "#,
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(Principal::ShopAdmin),
        };

        Ok(principal)
    }

    async fn shop_tenant_id(&self, shop_id: i64) -> Result<Option<i64>, AppError> {
        let tenant_id = sqlx::query_scalar::<_, i64>(
            "SELECT tenant_id FROM coffee_shops WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(shop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant_id)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory directory for tests.

    use std::collections::HashMap;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct MemoryDirectory {
        pub tenants: Vec<Tenant>,
        pub principals: Vec<Principal>,
        pub shop_tenants: HashMap<i64, i64>,
    }

    impl MemoryDirectory {
        pub fn with_tenant(mut self, id: i64, subdomain: &str, is_active: bool) -> Self {
            self.tenants.push(Tenant {
                id,
                subdomain: subdomain.to_string(),
                name: format!("{subdomain} coffee"),
                is_active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            self
        }

        pub fn with_shop(mut self, shop_id: i64, tenant_id: i64) -> Self {
            self.shop_tenants.insert(shop_id, tenant_id);
            self
        }

        pub fn with_principal(mut self, principal: Principal) -> Self {
            self.principals.push(principal);
            self
        }
    }

    #[async_trait]
    impl Directory for MemoryDirectory {
        async fn active_tenant_by_subdomain(
            &self,
            subdomain: &str,
        ) -> Result<Option<Tenant>, AppError> {
            Ok(self
                .tenants
                .iter()
                .find(|t| t.subdomain == subdomain && t.is_active)
                .cloned())
        }

        async fn active_principal(
            &self,
            kind: PrincipalKind,
            username: &str,
        ) -> Result<Option<Principal>, AppError> {
            Ok(self
                .principals
                .iter()
                .find(|p| p.kind() == kind && p.username() == username && p.is_active())
                .cloned())
        }

        async fn shop_tenant_id(&self, shop_id: i64) -> Result<Option<i64>, AppError> {
            Ok(self.shop_tenants.get(&shop_id).copied())
        }
    }
}
