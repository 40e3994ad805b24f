//! SQLite challenge catalog (read side).

use async_trait::async_trait;
use cookflow_domain::{Category, Challenge, ChallengeId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{get, get_id, get_optional_count, get_optional_id};
use crate::infrastructure::ports::{ChallengeRepo, RepoError};

const SELECT_COLUMNS: &str = r#"
    SELECT c.id AS id, c.title AS title, c.description AS description,
           c.image_url AS image_url, c.duration_days AS duration_days,
           c.target_count AS target_count, c.category_id AS category_id,
           cat.name AS category_name, cat.slug AS category_slug
    FROM challenges c
    LEFT JOIN categories cat ON cat.id = c.category_id
"#;

pub struct SqliteChallengeRepo {
    pool: SqlitePool,
}

impl SqliteChallengeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_challenge(row: &SqliteRow) -> Result<Challenge, RepoError> {
        let title: String = get(row, "title")?;
        let description: Option<String> = get(row, "description")?;
        let image_url: Option<String> = get(row, "image_url")?;

        let mut challenge = Challenge::new(title).with_id(get_id(row, "id")?);
        if let Some(description) = description {
            challenge = challenge.with_description(description);
        }
        if let Some(image_url) = image_url {
            challenge = challenge.with_image_url(image_url);
        }
        if let Some(days) = get_optional_count(row, "duration_days")? {
            challenge = challenge.with_duration_days(days);
        }
        if let Some(target) = get_optional_count(row, "target_count")? {
            challenge = challenge.with_target_count(target);
        }
        if let Some(category_id) = get_optional_id(row, "category_id")? {
            let name: Option<String> = get(row, "category_name")?;
            challenge = match name {
                Some(name) => challenge.with_category_details(Category {
                    id: category_id,
                    name,
                    slug: get(row, "category_slug")?,
                }),
                None => challenge.with_category(category_id),
            };
        }
        Ok(challenge)
    }
}

#[async_trait]
impl ChallengeRepo for SqliteChallengeRepo {
    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE c.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_challenge", e))?;

        row.as_ref().map(Self::row_to_challenge).transpose()
    }

    async fn list(&self) -> Result<Vec<Challenge>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY c.created_at DESC, c.title ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_challenges", e))?;

        rows.iter().map(Self::row_to_challenge).collect()
    }
}
