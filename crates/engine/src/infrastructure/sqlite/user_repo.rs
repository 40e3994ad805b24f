//! SQLite user lookups.

use async_trait::async_trait;
use cookflow_domain::{User, UserId};
use sqlx::SqlitePool;

use super::helpers::{get, get_id};
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_user", e))?;

        row.map(|row| {
            Ok(User {
                id: get_id(&row, "id")?,
                name: get(&row, "name")?,
                email: get(&row, "email")?,
                created_at: get(&row, "created_at")?,
            })
        })
        .transpose()
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_user", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("User", id));
        }
        Ok(())
    }
}
