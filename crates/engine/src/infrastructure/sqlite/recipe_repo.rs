//! SQLite recipe lookups needed by the cooking event.

use std::collections::HashSet;

use async_trait::async_trait;
use cookflow_domain::{CategoryId, RecipeId};
use sqlx::SqlitePool;

use super::helpers::get_id;
use crate::infrastructure::ports::{RecipeRepo, RepoError};

pub struct SqliteRecipeRepo {
    pool: SqlitePool,
}

impl SqliteRecipeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepo for SqliteRecipeRepo {
    async fn category_ids(&self, id: RecipeId) -> Result<Option<HashSet<CategoryId>>, RepoError> {
        let exists = sqlx::query("SELECT 1 FROM recipes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_recipe", e))?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query("SELECT category_id FROM recipe_categories WHERE recipe_id = ?")
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_recipe_categories", e))?;

        rows.iter()
            .map(|row| get_id(row, "category_id"))
            .collect::<Result<HashSet<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestDb;

    #[tokio::test]
    async fn unknown_recipe_is_none() {
        let db = TestDb::new().await;
        let repo = SqliteRecipeRepo::new(db.pool.clone());

        assert_eq!(repo.category_ids(RecipeId::new()).await.expect("lookup"), None);
    }

    #[tokio::test]
    async fn recipe_without_categories_is_an_empty_set() {
        let db = TestDb::new().await;
        let author = db.user("chef@example.com").await;
        let recipe = db.recipe(author, "Plain toast", &[]).await;
        let repo = SqliteRecipeRepo::new(db.pool.clone());

        assert_eq!(
            repo.category_ids(recipe).await.expect("lookup"),
            Some(HashSet::new())
        );
    }

    #[tokio::test]
    async fn returns_every_tagged_category() {
        let db = TestDb::new().await;
        let author = db.user("chef@example.com").await;
        let breakfast = db.category("Breakfast", "breakfast").await;
        let quick = db.category("Quick", "quick").await;
        let recipe = db.recipe(author, "Omelette", &[breakfast, quick]).await;
        let repo = SqliteRecipeRepo::new(db.pool.clone());

        assert_eq!(
            repo.category_ids(recipe).await.expect("lookup"),
            Some(HashSet::from([breakfast, quick]))
        );
    }
}
