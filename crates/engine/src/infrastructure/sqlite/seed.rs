//! Catalog writers and demo data.
//!
//! The engine never edits the catalog at runtime. These writers exist so a fresh
//! database can be populated for local use, and so tests can build fixtures.

use chrono::{DateTime, Utc};
use cookflow_domain::{CategoryId, Challenge, RecipeId, User, UserId};
use sqlx::SqlitePool;

use super::helpers::write_error;
use crate::infrastructure::ports::RepoError;

pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<(), RepoError> {
    sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(pool)
        .await
        .map_err(|e| write_error("insert_user", e))?;
    Ok(())
}

pub async fn insert_category(
    pool: &SqlitePool,
    id: CategoryId,
    name: &str,
    slug: &str,
) -> Result<(), RepoError> {
    sqlx::query("INSERT INTO categories (id, name, slug) VALUES (?, ?, ?)")
        .bind(id.to_string())
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await
        .map_err(|e| write_error("insert_category", e))?;
    Ok(())
}

/// Insert a recipe and its category links in one transaction.
pub async fn insert_recipe(
    pool: &SqlitePool,
    id: RecipeId,
    title: &str,
    author_id: UserId,
    categories: &[CategoryId],
    created_at: DateTime<Utc>,
) -> Result<(), RepoError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| RepoError::database("insert_recipe", e))?;

    sqlx::query("INSERT INTO recipes (id, title, author_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(title)
        .bind(author_id.to_string())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("insert_recipe", e))?;

    for category_id in categories {
        sqlx::query("INSERT INTO recipe_categories (recipe_id, category_id) VALUES (?, ?)")
            .bind(id.to_string())
            .bind(category_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error("insert_recipe_category", e))?;
    }

    tx.commit()
        .await
        .map_err(|e| RepoError::database("insert_recipe", e))
}

pub async fn insert_challenge(
    pool: &SqlitePool,
    challenge: &Challenge,
    created_at: DateTime<Utc>,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO challenges
            (id, title, description, image_url, duration_days, target_count, category_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(challenge.id().to_string())
    .bind(challenge.title())
    .bind(challenge.description())
    .bind(challenge.image_url())
    .bind(challenge.duration_days().map(i64::from))
    .bind(challenge.target_count().map(i64::from))
    .bind(challenge.category_id().map(|id| id.to_string()))
    .bind(created_at)
    .execute(pool)
    .await
    .map_err(|e| write_error("insert_challenge", e))?;
    Ok(())
}

/// Populate an empty database with demo users, categories, recipes and challenges.
///
/// Returns `false` without writing anything if any challenge already exists.
pub async fn seed_demo_data(pool: &SqlitePool, now: DateTime<Utc>) -> Result<bool, RepoError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM challenges")
        .fetch_one(pool)
        .await
        .map_err(|e| RepoError::database("seed_demo_data", e))?;
    if existing > 0 {
        tracing::debug!(existing, "Catalog already populated, skipping demo seed");
        return Ok(false);
    }

    let admin = User {
        id: UserId::new(),
        name: "Admin".to_string(),
        email: "admin@cookflow.local".to_string(),
        created_at: now,
    };
    let demo = User {
        id: UserId::new(),
        name: "Demo".to_string(),
        email: "demo@cookflow.local".to_string(),
        created_at: now,
    };
    insert_user(pool, &admin).await?;
    insert_user(pool, &demo).await?;

    let breakfast = CategoryId::new();
    let chicken = CategoryId::new();
    let quick = CategoryId::new();
    let dessert = CategoryId::new();
    insert_category(pool, breakfast, "Breakfast", "breakfast").await?;
    insert_category(pool, chicken, "Chicken", "chicken").await?;
    insert_category(pool, quick, "Quick", "quick").await?;
    insert_category(pool, dessert, "Desserts", "dessert").await?;

    insert_recipe(
        pool,
        RecipeId::new(),
        "Five-minute omelette",
        admin.id,
        &[breakfast, quick],
        now,
    )
    .await?;
    insert_recipe(pool, RecipeId::new(), "Cheesy chicken", admin.id, &[chicken], now).await?;
    insert_recipe(
        pool,
        RecipeId::new(),
        "Simple dessert",
        admin.id,
        &[dessert, quick],
        now,
    )
    .await?;

    let challenges = [
        Challenge::new("Chicken marathon")
            .with_description("Cook 3 chicken recipes within a week")
            .with_target_count(3)
            .with_duration_days(7)
            .with_category(chicken),
        Challenge::new("Quick recipes")
            .with_description("Cook 5 quick recipes within 10 days")
            .with_target_count(5)
            .with_duration_days(10)
            .with_category(quick),
        Challenge::new("Any recipes: warm-up")
            .with_description("Cook any 2 recipes within 3 days")
            .with_target_count(2)
            .with_duration_days(3),
    ];
    for challenge in &challenges {
        insert_challenge(pool, challenge, now).await?;
    }

    tracing::info!(
        users = 2,
        recipes = 3,
        challenges = challenges.len(),
        "Seeded demo data"
    );
    Ok(true)
}
