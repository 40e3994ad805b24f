//! SQLite progress store.
//!
//! The `(user_id, challenge_id)` unique index rejects duplicate starts. Every
//! update is a compare-and-set on the count read by the caller and only touches
//! active rows (`completed_at IS NULL`). A write based on a stale read fails
//! instead of replacing a newer count or completion stamp.

use async_trait::async_trait;
use cookflow_domain::{ChallengeId, ChallengeProgress, ProgressId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{get, get_count, get_id, write_error};
use crate::infrastructure::ports::{ProgressChange, ProgressRepo, RepoError};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, challenge_id, completed_count, started_at, completed_at FROM challenge_progress";

pub struct SqliteProgressRepo {
    pool: SqlitePool,
}

impl SqliteProgressRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_progress(row: &SqliteRow) -> Result<ChallengeProgress, RepoError> {
        Ok(ChallengeProgress::restore(
            get_id(row, "id")?,
            get_id(row, "user_id")?,
            get_id(row, "challenge_id")?,
            get_count(row, "completed_count")?,
            get(row, "started_at")?,
            get(row, "completed_at")?,
        ))
    }

    async fn exists(&self, id: ProgressId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM challenge_progress WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("progress_exists", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl ProgressRepo for SqliteProgressRepo {
    async fn find(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<ChallengeProgress>, RepoError> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ? AND challenge_id = ?"
        ))
        .bind(user_id.to_string())
        .bind(challenge_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_progress", e))?;

        row.as_ref().map(Self::row_to_progress).transpose()
    }

    async fn list_active_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChallengeProgress>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ? AND completed_at IS NULL ORDER BY started_at DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_active_progress", e))?;

        rows.iter().map(Self::row_to_progress).collect()
    }

    async fn insert(&self, progress: &ChallengeProgress) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO challenge_progress
                (id, user_id, challenge_id, completed_count, started_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(progress.id().to_string())
        .bind(progress.user_id().to_string())
        .bind(progress.challenge_id().to_string())
        .bind(i64::from(progress.completed_count()))
        .bind(progress.started_at())
        .bind(progress.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("insert_progress", e))?;

        Ok(())
    }

    async fn update(&self, change: &ProgressChange) -> Result<(), RepoError> {
        let progress = &change.progress;
        let result = sqlx::query(
            r#"
            UPDATE challenge_progress
            SET completed_count = ?, completed_at = ?
            WHERE id = ? AND completed_count = ? AND completed_at IS NULL
            "#,
        )
        .bind(i64::from(progress.completed_count()))
        .bind(progress.completed_at())
        .bind(progress.id().to_string())
        .bind(i64::from(change.expected_count))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update_progress", e))?;

        if result.rows_affected() == 0 {
            // Either gone, or written by someone else since it was read.
            return Err(if self.exists(progress.id()).await? {
                RepoError::conflict("ChallengeProgress", progress.id())
            } else {
                RepoError::not_found("ChallengeProgress", progress.id())
            });
        }

        Ok(())
    }

    async fn update_batch(&self, changes: &[ProgressChange]) -> Result<(), RepoError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update_progress_batch", e))?;

        for change in changes {
            let result = sqlx::query(
                r#"
                UPDATE challenge_progress
                SET completed_count = ?, completed_at = ?
                WHERE id = ? AND completed_count = ? AND completed_at IS NULL
                "#,
            )
            .bind(i64::from(change.progress.completed_count()))
            .bind(change.progress.completed_at())
            .bind(change.progress.id().to_string())
            .bind(i64::from(change.expected_count))
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error("update_progress_batch", e))?;

            if result.rows_affected() != 1 {
                tx.rollback()
                    .await
                    .map_err(|e| RepoError::database("update_progress_batch", e))?;
                return Err(RepoError::conflict(
                    "ChallengeProgress",
                    change.progress.id(),
                ));
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update_progress_batch", e))?;

        Ok(())
    }
}
