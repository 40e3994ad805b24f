//! SQLite database implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

mod helpers;

mod challenge_repo;
mod progress_repo;
mod recipe_repo;
pub mod schema;
pub mod seed;
mod user_repo;

pub use challenge_repo::SqliteChallengeRepo;
pub use progress_repo::SqliteProgressRepo;
pub use recipe_repo::SqliteRecipeRepo;
pub use user_repo::SqliteUserRepo;

const MAX_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the database file and return a pool.
///
/// Foreign keys are enforced so deleting a user or challenge cascades to progress.
pub async fn connect(db_path: impl AsRef<Path>) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path.as_ref())
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    tracing::info!(path = %db_path.as_ref().display(), "Connected to SQLite");
    Ok(pool)
}

/// Create all SQLite repositories from a pool.
pub struct SqliteRepositories {
    pub progress: Arc<SqliteProgressRepo>,
    pub challenge: Arc<SqliteChallengeRepo>,
    pub recipe: Arc<SqliteRecipeRepo>,
    pub user: Arc<SqliteUserRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            progress: Arc::new(SqliteProgressRepo::new(pool.clone())),
            challenge: Arc::new(SqliteChallengeRepo::new(pool.clone())),
            recipe: Arc::new(SqliteRecipeRepo::new(pool.clone())),
            user: Arc::new(SqliteUserRepo::new(pool)),
        }
    }
}
