//! Common test helpers.
//!
//! `TestDb` opens a migrated SQLite file in a temp directory that lives as long
//! as the value. The builder methods insert catalog rows with fresh ids.
//!
//! # Usage
//!
//! ```rust,ignore
//! let db = TestDb::new().await;
//! let user = db.user("cook@example.com").await;
//! let challenge = db.challenge(Challenge::new("Any").with_target_count(2)).await;
//! ```

use chrono::{DateTime, TimeZone, Utc};
use cookflow_domain::{CategoryId, Challenge, RecipeId, User, UserId};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::infrastructure::sqlite::{self, schema, seed};

/// Reference instant shared by tests that need a deterministic clock.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let pool = sqlite::connect(dir.path().join("cookflow.db"))
            .await
            .expect("connect");
        schema::ensure_schema(&pool).await.expect("schema");
        Self { pool, _dir: dir }
    }

    pub async fn user(&self, email: &str) -> UserId {
        let user = User {
            id: UserId::new(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            created_at: t0(),
        };
        seed::insert_user(&self.pool, &user)
            .await
            .expect("insert user");
        user.id
    }

    pub async fn category(&self, name: &str, slug: &str) -> CategoryId {
        let id = CategoryId::new();
        seed::insert_category(&self.pool, id, name, slug)
            .await
            .expect("insert category");
        id
    }

    pub async fn recipe(&self, author: UserId, title: &str, categories: &[CategoryId]) -> RecipeId {
        let id = RecipeId::new();
        seed::insert_recipe(&self.pool, id, title, author, categories, t0())
            .await
            .expect("insert recipe");
        id
    }

    pub async fn challenge(&self, challenge: Challenge) -> Challenge {
        seed::insert_challenge(&self.pool, &challenge, t0())
            .await
            .expect("insert challenge");
        challenge
    }
}
