//! Menu items.
//!
//! Every function takes the shop id explicitly; for shop admins it comes from the
//! verified token, never from the request body or path.

use validator::Validate;

use crate::{
    db::DbPool,
    error::AppError,
    models::menu_item::{
        CreateMenuItemRequest, MenuItem, MenuItemResponse, MenuItemRow, UpdateMenuItemRequest,
    },
};

const ITEM_COLUMNS: &str = "id, coffee_shop_id, category_id, name, price, price_premium, \
                            has_dual_pricing, image_url, order_index, is_available, created_at, updated_at";

const ITEM_WITH_CATEGORY: &str = r#"
    SELECT m.id, m.coffee_shop_id, m.category_id, m.name, m.price, m.price_premium,
           m.has_dual_pricing, m.image_url, m.order_index, m.is_available, m.created_at, m.updated_at,
           c.name AS category_name,
           c.display_name AS category_display_name,
           c.emoji AS category_emoji,
           c.color AS category_color
    FROM menu_items m
    JOIN categories c ON c.id = m.category_id
"#;

/// Public menu of a tenant: available items of its active shops, in display order.
pub async fn public_menu(pool: &DbPool, tenant_id: i64) -> Result<Vec<MenuItemResponse>, AppError> {
    let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
        r#"{ITEM_WITH_CATEGORY}
        WHERE m.deleted_at IS NULL
          AND m.is_available = true
          AND c.is_active = true
          AND m.coffee_shop_id IN (
              SELECT id FROM coffee_shops
              WHERE tenant_id = $1 AND is_active = true AND deleted_at IS NULL
          )
        ORDER BY m.order_index, m.id
        "#
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// All items of one shop, including unavailable ones.
pub async fn list_items(pool: &DbPool, shop_id: i64) -> Result<Vec<MenuItemResponse>, AppError> {
    let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
        r#"{ITEM_WITH_CATEGORY}
        WHERE m.coffee_shop_id = $1 AND m.deleted_at IS NULL
        ORDER BY m.order_index, m.id
        "#
    ))
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_item(
    pool: &DbPool,
    shop_id: i64,
    item_id: i64,
) -> Result<MenuItemResponse, AppError> {
    let row = sqlx::query_as::<_, MenuItemRow>(&format!(
        r#"{ITEM_WITH_CATEGORY}
        WHERE m.id = $1 AND m.coffee_shop_id = $2 AND m.deleted_at IS NULL
        "#
    ))
    .bind(item_id)
    // Items of other shops look like missing items
    .bind(shop_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Menu item"))?;

    Ok(row.into())
}

async fn ensure_category(pool: &DbPool, category_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND deleted_at IS NULL)",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(AppError::InvalidRequest(format!(
            "Unknown category {category_id}"
        )));
    }
    Ok(())
}

pub async fn create_item(
    pool: &DbPool,
    shop_id: i64,
    request: CreateMenuItemRequest,
) -> Result<MenuItem, AppError> {
    request.validate()?;
    ensure_category(pool, request.category_id).await?;

    let item = sqlx::query_as::<_, MenuItem>(&format!(
        r#"
        INSERT INTO menu_items (
            coffee_shop_id, category_id, name, price, price_premium,
            has_dual_pricing, image_url, order_index, is_available
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(shop_id)
    .bind(request.category_id)
    .bind(request.name)
    .bind(request.price)
    .bind(request.price_premium)
    .bind(request.has_dual_pricing)
    .bind(request.image_url.unwrap_or_default())
    .bind(request.order_index)
    .bind(request.is_available)
    .fetch_one(pool)
    .await?;

    tracing::debug!(shop_id, item_id = item.id, "menu item created");
    Ok(item)
}

pub async fn update_item(
    pool: &DbPool,
    shop_id: i64,
    item_id: i64,
    request: UpdateMenuItemRequest,
) -> Result<MenuItem, AppError> {
    request.validate()?;
    if let Some(category_id) = request.category_id {
        ensure_category(pool, category_id).await?;
    }

    sqlx::query_as::<_, MenuItem>(&format!(
        r#"
        UPDATE menu_items
        SET name = COALESCE($3, name),
            category_id = COALESCE($4, category_id),
            price = COALESCE($5, price),
            price_premium = COALESCE($6, price_premium),
            has_dual_pricing = COALESCE($7, has_dual_pricing),
            image_url = COALESCE($8, image_url),
            order_index = COALESCE($9, order_index),
            is_available = COALESCE($10, is_available),
            updated_at = NOW()
        WHERE id = $1 AND coffee_shop_id = $2 AND deleted_at IS NULL
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(shop_id)
    .bind(request.name)
    .bind(request.category_id)
    .bind(request.price)
    .bind(request.price_premium)
    .bind(request.has_dual_pricing)
    .bind(request.image_url)
    .bind(request.order_index)
    .bind(request.is_available)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Menu item"))
}

pub async fn delete_item(pool: &DbPool, shop_id: i64, item_id: i64) -> Result<(), AppError> {
    let affected = sqlx::query(
        r#"
        UPDATE menu_items
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND coffee_shop_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(item_id)
    .bind(shop_id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound("Menu item"));
    }
    Ok(())
}
