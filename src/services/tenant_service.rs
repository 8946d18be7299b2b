//! Tenant management for the platform admin.

use validator::Validate;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        coffee_shop::CoffeeShop,
        tenant::{CreateTenantRequest, Tenant, TenantDetails, UpdateTenantRequest},
    },
    services::shop_service,
    tenancy,
};

/// Subdomains are lowercase DNS labels: ASCII lowercase letters, digits and inner
/// hyphens. Clients lowercase host names and lookup is exact, so an uppercase
/// subdomain could never be reached. Labels that host resolution ignores cannot be
/// assigned.
pub fn validate_subdomain(subdomain: &str) -> Result<(), AppError> {
    let valid_chars = subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(AppError::InvalidRequest(
            "subdomain may only contain lowercase letters, digits and inner hyphens".to_string(),
        ));
    }
    if tenancy::is_reserved_label(subdomain) {
        return Err(AppError::InvalidRequest(format!(
            "subdomain '{subdomain}' is reserved"
        )));
    }
    Ok(())
}

pub async fn list_tenants(pool: &DbPool) -> Result<Vec<Tenant>, AppError> {
    let tenants = sqlx::query_as::<_, Tenant>(
        r#"
        SELECT id, subdomain, name, is_active, created_at, updated_at
        FROM tenants
        WHERE deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tenants)
}

pub async fn find_tenant(pool: &DbPool, tenant_id: i64) -> Result<Option<Tenant>, AppError> {
    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        SELECT id, subdomain, name, is_active, created_at, updated_at
        FROM tenants
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(tenant)
}

/// Create a tenant. New tenants start active.
///
/// # Errors
///
/// - `InvalidRequest`: bad subdomain or name
/// - `Conflict`: subdomain already taken
pub async fn create_tenant(pool: &DbPool, request: CreateTenantRequest) -> Result<Tenant, AppError> {
    request.validate()?;
    validate_subdomain(&request.subdomain)?;

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM tenants WHERE subdomain = $1 AND deleted_at IS NULL)",
    )
    .bind(&request.subdomain)
    .fetch_one(pool)
    .await?;

    if taken {
        return Err(AppError::Conflict(format!(
            "Subdomain '{}' is already taken",
            request.subdomain
        )));
    }

    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        INSERT INTO tenants (subdomain, name, is_active)
        VALUES ($1, $2, true)
        RETURNING id, subdomain, name, is_active, created_at, updated_at
        "#,
    )
    .bind(&request.subdomain)
    .bind(&request.name)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        AppError::conflict_on_unique(
            err,
            format!("Subdomain '{}' is already taken", request.subdomain),
        )
    })?;

    tracing::info!(tenant_id = tenant.id, subdomain = %tenant.subdomain, "tenant created");
    Ok(tenant)
}

/// Tenant with all of its (non-deleted) shops.
pub async fn get_tenant(pool: &DbPool, tenant_id: i64) -> Result<TenantDetails, AppError> {
    let tenant = find_tenant(pool, tenant_id)
        .await?
        .ok_or(AppError::NotFound("Tenant"))?;
    let coffee_shops: Vec<CoffeeShop> = shop_service::list_shops(pool, tenant_id).await?;

    Ok(TenantDetails {
        tenant,
        coffee_shops,
    })
}

pub async fn update_tenant(
    pool: &DbPool,
    tenant_id: i64,
    request: UpdateTenantRequest,
) -> Result<Tenant, AppError> {
    request.validate()?;

    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        UPDATE tenants
        SET name = COALESCE($2, name),
            is_active = COALESCE($3, is_active),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, subdomain, name, is_active, created_at, updated_at
        "#,
    )
    .bind(tenant_id)
    .bind(request.name)
    .bind(request.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Tenant"))?;

    Ok(tenant)
}

/// Soft delete: the row stays, deactivated and stamped with `deleted_at`.
pub async fn delete_tenant(pool: &DbPool, tenant_id: i64) -> Result<(), AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE tenants
        SET is_active = false, deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(tenant_id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound("Tenant"));
    }

    tracing::info!(tenant_id, "tenant deleted");
    Ok(())
}
