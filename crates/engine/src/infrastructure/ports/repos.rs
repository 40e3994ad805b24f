//! Repository port traits for database access.

use std::collections::HashSet;

use async_trait::async_trait;
use cookflow_domain::{
    CategoryId, Challenge, ChallengeId, ChallengeProgress, RecipeId, User, UserId,
};

use super::error::RepoError;
use super::types::ProgressChange;

// =============================================================================
// Progress Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepo: Send + Sync {
    async fn find(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<ChallengeProgress>, RepoError>;

    /// Records without a completion stamp, most recently started first.
    async fn list_active_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChallengeProgress>, RepoError>;

    /// Fails with `RepoError::UniqueViolation` if the (user, challenge) pair exists.
    async fn insert(&self, progress: &ChallengeProgress) -> Result<(), RepoError>;

    /// Compare-and-set on the count the caller read.
    ///
    /// Fails with `RepoError::NotFound` if the record does not exist, and with
    /// `RepoError::Conflict` if it moved or completed since it was read.
    async fn update(&self, change: &ProgressChange) -> Result<(), RepoError>;

    /// Apply every change or none of them.
    ///
    /// Fails with `RepoError::Conflict` if any row moved since it was read.
    async fn update_batch(&self, changes: &[ProgressChange]) -> Result<(), RepoError>;
}

// =============================================================================
// Catalog (read-only to the engine)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChallengeRepo: Send + Sync {
    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Challenge>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepo: Send + Sync {
    /// Category set of a recipe, or `None` if the recipe does not exist.
    async fn category_ids(&self, id: RecipeId) -> Result<Option<HashSet<CategoryId>>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Removing a user cascades to their progress records in storage.
    async fn delete(&self, id: UserId) -> Result<(), RepoError>;
}
