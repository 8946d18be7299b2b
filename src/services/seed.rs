//! Sample data for local development (`--seed`).
//!
//! Each step only runs when its table is empty, so seeding twice is harmless.

use std::collections::HashMap;

use crate::{auth::password::hash_password, db::DbPool, error::AppError};

struct SeedCategory {
    name: &'static str,
    display_name: &'static str,
    emoji: &'static str,
    color: &'static str,
}

const CATEGORIES: [SeedCategory; 8] = [
    SeedCategory { name: "coffee", display_name: "Coffee", emoji: "☕", color: "from-amber-400 to-orange-500" },
    SeedCategory { name: "shake", display_name: "Shakes", emoji: "🥤", color: "from-pink-400 to-rose-500" },
    SeedCategory { name: "cold_bar", display_name: "Cold Bar", emoji: "🧊", color: "from-sky-400 to-blue-500" },
    SeedCategory { name: "hot_bar", display_name: "Hot Bar", emoji: "🔥", color: "from-red-500 to-orange-500" },
    SeedCategory { name: "tea", display_name: "Tea", emoji: "🍵", color: "from-lime-400 to-green-500" },
    SeedCategory { name: "cake", display_name: "Cakes", emoji: "🍰", color: "from-fuchsia-500 to-pink-600" },
    SeedCategory { name: "food", display_name: "Food", emoji: "🍽️", color: "from-indigo-400 to-purple-500" },
    SeedCategory { name: "breakfast", display_name: "Breakfast", emoji: "🌅", color: "from-yellow-400 to-amber-500" },
];

/// (category, name, price, premium price)
const MENU: [(&str, &str, i32, Option<i32>); 12] = [
    ("coffee", "Espresso", 45000, Some(55000)),
    ("coffee", "Americano", 30000, Some(40000)),
    ("coffee", "Cappuccino", 40000, Some(50000)),
    ("coffee", "Latte", 42000, Some(52000)),
    ("shake", "Nutella Shake", 65000, None),
    ("shake", "Oreo Shake", 68000, None),
    ("cold_bar", "Mojito", 50000, None),
    ("hot_bar", "Hot Chocolate", 55000, None),
    ("tea", "Masala Tea", 40000, None),
    ("cake", "Cheesecake", 85000, None),
    ("food", "Caesar Salad", 85000, None),
    ("breakfast", "Omelette", 75000, None),
];

async fn is_empty(pool: &DbPool, table: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

pub async fn seed_database(pool: &DbPool) -> Result<(), AppError> {
    seed_main_admin(pool).await?;
    seed_categories(pool).await?;
    seed_demo_tenant(pool).await?;

    tracing::info!("database seeded");
    Ok(())
}

async fn seed_main_admin(pool: &DbPool) -> Result<(), AppError> {
    if !is_empty(pool, "main_admins").await? {
        tracing::info!("main admin already exists, skipping");
        return Ok(());
    }

    let password_hash = hash_password("admin123").await?;
    sqlx::query("INSERT INTO main_admins (username, password_hash, is_active) VALUES ($1, $2, true)")
        .bind("admin")
        .bind(password_hash)
        .execute(pool)
        .await?;

    tracing::info!(username = "admin", "main admin created");
    Ok(())
}

async fn seed_categories(pool: &DbPool) -> Result<(), AppError> {
    if !is_empty(pool, "categories").await? {
        tracing::info!("categories already exist, skipping");
        return Ok(());
    }

    for (index, category) in CATEGORIES.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO categories (name, display_name, emoji, color, order_index, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            "#,
        )
        .bind(category.name)
        .bind(category.display_name)
        .bind(category.emoji)
        .bind(category.color)
        .bind(index as i32 + 1)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = CATEGORIES.len(), "categories created");
    Ok(())
}

async fn seed_demo_tenant(pool: &DbPool) -> Result<(), AppError> {
    if !is_empty(pool, "tenants").await? {
        tracing::info!("tenants already exist, skipping demo tenant");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let tenant_id: i64 = sqlx::query_scalar(
        "INSERT INTO tenants (subdomain, name, is_active) VALUES ($1, $2, true) RETURNING id",
    )
    .bind("demo")
    .bind("Demo Coffee Shop")
    .fetch_one(&mut *tx)
    .await?;

    let shop_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO coffee_shops (
            tenant_id, name, location, phone, instagram_url, logo_url, hero_image_url, description, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true)
        RETURNING id
        "#,
    )
    .bind(tenant_id)
    .bind("Demo Coffee Shop")
    .bind("Tehran, Iran")
    .bind("+98-21-12345678")
    .bind("https://instagram.com/democoffee")
    .bind("https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=200")
    .bind("https://images.unsplash.com/photo-1554118811-1e0d58224f24?w=800")
    .bind("Best coffee in Tehran")
    .fetch_one(&mut *tx)
    .await?;

    let password_hash = hash_password("shop123").await?;
    sqlx::query(
        "INSERT INTO shop_admins (coffee_shop_id, username, password_hash, is_active) VALUES ($1, $2, $3, true)",
    )
    .bind(shop_id)
    .bind("shopadmin")
    .bind(password_hash)
    .execute(&mut *tx)
    .await?;

    let category_ids: HashMap<String, i64> =
        sqlx::query_as::<_, (String, i64)>("SELECT name, id FROM categories WHERE deleted_at IS NULL")
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .collect();

    let mut created = 0;
    for (order, (category, name, price, premium)) in MENU.iter().enumerate() {
        let Some(category_id) = category_ids.get(*category) else {
            tracing::warn!(category, "category missing, skipping sample item");
            continue;
        };

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                coffee_shop_id, category_id, name, price, price_premium,
                has_dual_pricing, order_index, is_available
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, true)
            "#,
        )
        .bind(shop_id)
        .bind(category_id)
        .bind(*name)
        .bind(*price)
        .bind(*premium)
        .bind(premium.is_some())
        .bind(order as i32 + 1)
        .execute(&mut *tx)
        .await?;
        created += 1;
    }

    tx.commit().await?;

    tracing::info!(tenant_id, shop_id, items = created, "demo tenant created");
    Ok(())
}
