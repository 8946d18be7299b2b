//! Coffee shop and shop admin management.
//!
//! Platform admins manage any shop by id. Shop admins reach the same update path
//! through `/api/admin/settings`, with the shop id taken from their token.

use validator::Validate;

use crate::{
    auth::password::hash_password,
    db::DbPool,
    error::AppError,
    models::{
        admin::{CreateShopAdminRequest, ShopAdmin},
        coffee_shop::{CoffeeShop, CreateCoffeeShopRequest, ShopDetails, UpdateCoffeeShopRequest},
    },
    services::tenant_service,
};

const SHOP_COLUMNS: &str = "id, tenant_id, name, location, phone, instagram_url, logo_url, \
                            hero_image_url, description, is_active, created_at, updated_at";

pub async fn list_shops(pool: &DbPool, tenant_id: i64) -> Result<Vec<CoffeeShop>, AppError> {
    let shops = sqlx::query_as::<_, CoffeeShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM coffee_shops \
         WHERE tenant_id = $1 AND deleted_at IS NULL ORDER BY id"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

pub async fn find_shop(pool: &DbPool, shop_id: i64) -> Result<CoffeeShop, AppError> {
    sqlx::query_as::<_, CoffeeShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM coffee_shops WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Coffee shop"))
}

/// The shop shown on a tenant's public pages: its first active shop.
pub async fn public_shop(pool: &DbPool, tenant_id: i64) -> Result<CoffeeShop, AppError> {
    sqlx::query_as::<_, CoffeeShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM coffee_shops \
         WHERE tenant_id = $1 AND is_active = true AND deleted_at IS NULL \
         ORDER BY id LIMIT 1"
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Coffee shop"))
}

/// Create a shop under `tenant_id`. The owning tenant never changes afterwards.
pub async fn create_shop(
    pool: &DbPool,
    tenant_id: i64,
    request: CreateCoffeeShopRequest,
) -> Result<CoffeeShop, AppError> {
    request.validate()?;

    tenant_service::find_tenant(pool, tenant_id)
        .await?
        .ok_or(AppError::NotFound("Tenant"))?;

    let shop = sqlx::query_as::<_, CoffeeShop>(&format!(
        r#"
        INSERT INTO coffee_shops (
            tenant_id, name, location, phone, instagram_url, logo_url, hero_image_url, description, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true)
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(tenant_id)
    .bind(request.name)
    .bind(request.location.unwrap_or_default())
    .bind(request.phone.unwrap_or_default())
    .bind(request.instagram_url.unwrap_or_default())
    .bind(request.logo_url.unwrap_or_default())
    .bind(request.hero_image_url.unwrap_or_default())
    .bind(request.description.unwrap_or_default())
    .fetch_one(pool)
    .await?;

    tracing::info!(shop_id = shop.id, tenant_id, "coffee shop created");
    Ok(shop)
}

pub async fn get_shop_details(pool: &DbPool, shop_id: i64) -> Result<ShopDetails, AppError> {
    let shop = find_shop(pool, shop_id).await?;
    let tenant = tenant_service::find_tenant(pool, shop.tenant_id)
        .await?
        .ok_or(AppError::NotFound("Tenant"))?;

    let admins = sqlx::query_as::<_, ShopAdmin>(
        r#"
        SELECT id, coffee_shop_id, username, password_hash, is_active, created_at, updated_at
        FROM shop_admins
        WHERE coffee_shop_id = $1 AND deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(ShopDetails {
        shop,
        tenant,
        admins,
    })
}

/// Apply a partial profile update. Fields left out of the request keep their value.
pub async fn update_shop(
    pool: &DbPool,
    shop_id: i64,
    request: UpdateCoffeeShopRequest,
) -> Result<CoffeeShop, AppError> {
    request.validate()?;

    sqlx::query_as::<_, CoffeeShop>(&format!(
        r#"
        UPDATE coffee_shops
        SET name = COALESCE($2, name),
            location = COALESCE($3, location),
            phone = COALESCE($4, phone),
            instagram_url = COALESCE($5, instagram_url),
            logo_url = COALESCE($6, logo_url),
            hero_image_url = COALESCE($7, hero_image_url),
            description = COALESCE($8, description),
            is_active = COALESCE($9, is_active),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(shop_id)
    .bind(request.name)
    .bind(request.location)
    .bind(request.phone)
    .bind(request.instagram_url)
    .bind(request.logo_url)
    .bind(request.hero_image_url)
    .bind(request.description)
    .bind(request.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Coffee shop"))
}

pub async fn delete_shop(pool: &DbPool, shop_id: i64) -> Result<(), AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE coffee_shops
        SET is_active = false, deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(shop_id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound("Coffee shop"));
    }

    tracing::info!(shop_id, "coffee shop deleted");
    Ok(())
}

/// Create an admin bound to `shop_id`. The binding is permanent.
///
/// # Errors
///
/// - `NotFound`: shop does not exist
/// - `Conflict`: username already used by another shop admin
pub async fn create_shop_admin(
    pool: &DbPool,
    shop_id: i64,
    request: CreateShopAdminRequest,
) -> Result<ShopAdmin, AppError> {
    request.validate()?;
    find_shop(pool, shop_id).await?;

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM shop_admins WHERE username = $1 AND deleted_at IS NULL)",
    )
    .bind(&request.username)
    .fetch_one(pool)
    .await?;

    if taken {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            request.username
        )));
    }

    let password_hash = hash_password(&request.password).await?;

    let admin = sqlx::query_as::<_, ShopAdmin>(
        r#"
        INSERT INTO shop_admins (coffee_shop_id, username, password_hash, is_active)
        VALUES ($1, $2, $3, true)
        RETURNING id, coffee_shop_id, username, password_hash, is_active, created_at, updated_at
        "#,
    )
    .bind(shop_id)
    .bind(&request.username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        AppError::conflict_on_unique(
            err,
            format!("Username '{}' is already taken", request.username),
        )
    })?;

    tracing::info!(shop_id, admin_id = admin.id, "shop admin created");
    Ok(admin)
}
