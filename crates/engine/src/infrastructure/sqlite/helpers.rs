//! Row-mapping helpers shared by the SQLite repositories.

use std::str::FromStr;

use cookflow_domain::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::infrastructure::ports::RepoError;

/// Read a TEXT id column into a typed id.
pub(super) fn get_id<T>(row: &SqliteRow, column: &str) -> Result<T, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    let raw: String = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    raw.parse().map_err(RepoError::serialization)
}

/// Read an optional TEXT id column into a typed id.
pub(super) fn get_optional_id<T>(row: &SqliteRow, column: &str) -> Result<Option<T>, RepoError>
where
    T: FromStr<Err = DomainError>,
{
    let raw: Option<String> = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    raw.map(|value| value.parse().map_err(RepoError::serialization))
        .transpose()
}

/// Read a non-negative INTEGER column.
pub(super) fn get_count(row: &SqliteRow, column: &str) -> Result<u32, RepoError> {
    let raw: i64 = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    u32::try_from(raw).map_err(|_| RepoError::serialization(format!("{column} out of range: {raw}")))
}

/// Read a nullable non-negative INTEGER column.
pub(super) fn get_optional_count(row: &SqliteRow, column: &str) -> Result<Option<u32>, RepoError> {
    let raw: Option<i64> = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))?;
    raw.map(|value| {
        u32::try_from(value)
            .map_err(|_| RepoError::serialization(format!("{column} out of range: {value}")))
    })
    .transpose()
}

/// Read any other column, mapping decode failures to `RepoError::Serialization`.
pub(super) fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepoError::serialization(format!("{column}: {e}")))
}

/// Classify a write error, surfacing unique-index rejections separately.
pub(super) fn write_error(operation: &'static str, error: sqlx::Error) -> RepoError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            RepoError::unique_violation(operation, db_error.message())
        }
        _ => RepoError::database(operation, error),
    }
}
