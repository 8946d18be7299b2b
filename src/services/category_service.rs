//! Shared menu categories.

use validator::Validate;

use crate::{
    db::DbPool,
    error::AppError,
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
};

const CATEGORY_COLUMNS: &str =
    "id, name, display_name, emoji, color, order_index, is_active, created_at, updated_at";

/// Categories visible on menus, in display order.
pub async fn list_active_categories(pool: &DbPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories \
         WHERE is_active = true AND deleted_at IS NULL ORDER BY order_index, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Every category including inactive ones, for the platform admin.
pub async fn list_all_categories(pool: &DbPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories \
         WHERE deleted_at IS NULL ORDER BY order_index, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(pool: &DbPool, category_id: i64) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(category_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Category"))
}

async fn name_taken(pool: &DbPool, name: &str, except_id: Option<i64>) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM categories
            WHERE name = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

pub async fn create_category(
    pool: &DbPool,
    request: CreateCategoryRequest,
) -> Result<Category, AppError> {
    request.validate()?;

    if name_taken(pool, &request.name, None).await? {
        return Err(AppError::Conflict("Category name already exists".to_string()));
    }

    let category = sqlx::query_as::<_, Category>(&format!(
        r#"
        INSERT INTO categories (name, display_name, emoji, color, order_index, is_active)
        VALUES ($1, $2, $3, $4, $5, true)
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(request.name)
    .bind(request.display_name)
    .bind(request.emoji)
    .bind(request.color)
    .bind(request.order_index)
    .fetch_one(pool)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "Category name already exists"))?;

    Ok(category)
}

pub async fn update_category(
    pool: &DbPool,
    category_id: i64,
    request: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    request.validate()?;

    if let Some(name) = &request.name {
        if name_taken(pool, name, Some(category_id)).await? {
            return Err(AppError::Conflict("Category name already exists".to_string()));
        }
    }

    sqlx::query_as::<_, Category>(&format!(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            display_name = COALESCE($3, display_name),
            emoji = COALESCE($4, emoji),
            color = COALESCE($5, color),
            order_index = COALESCE($6, order_index),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(category_id)
    .bind(request.name)
    .bind(request.display_name)
    .bind(request.emoji)
    .bind(request.color)
    .bind(request.order_index)
    .bind(request.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, "Category name already exists"))?
    .ok_or(AppError::NotFound("Category"))
}

/// Soft-delete a category. Refused while any menu item still uses it.
pub async fn delete_category(pool: &DbPool, category_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let in_use: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM menu_items WHERE category_id = $1 AND deleted_at IS NULL)",
    )
    .bind(category_id)
    .fetch_one(&mut *tx)
    .await?;

    if in_use {
        tx.rollback().await?;
        return Err(AppError::Conflict(
            "Cannot delete category with existing menu items".to_string(),
        ));
    }

    let affected = sqlx::query(
        "UPDATE categories SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(category_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if affected == 0 {
        tx.rollback().await?;
        return Err(AppError::NotFound("Category"));
    }

    tx.commit().await?;
    Ok(())
}
