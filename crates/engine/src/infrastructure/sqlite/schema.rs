//! SQLite schema initialization - tables, constraints and indexes.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        slug TEXT UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_categories (
        recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        PRIMARY KEY (recipe_id, category_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS challenges (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        image_url TEXT,
        duration_days INTEGER,
        target_count INTEGER,
        category_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
        created_at TEXT NOT NULL
    )
    "#,
    // The (user_id, challenge_id) unique index is what makes concurrent starts safe.
    r#"
    CREATE TABLE IF NOT EXISTS challenge_progress (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        challenge_id TEXT NOT NULL REFERENCES challenges(id) ON DELETE CASCADE,
        completed_count INTEGER NOT NULL DEFAULT 0,
        started_at TEXT NOT NULL,
        completed_at TEXT,
        CONSTRAINT uq_user_challenge_progress UNIQUE (user_id, challenge_id),
        CONSTRAINT ck_challenge_completed_ge_0 CHECK (completed_count >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_progress_user_active ON challenge_progress (user_id, completed_at)",
    "CREATE INDEX IF NOT EXISTS idx_challenges_category ON challenges (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_categories_category ON recipe_categories (category_id)",
];

/// Create tables and indexes if they do not exist.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    tracing::info!("SQLite schema initialized (tables and indexes ensured)");
    Ok(())
}
