//! Challenge use cases.
//!
//! The progress engine. A user starts a challenge, then moves it forward either
//! with manual updates or by cooking recipes. The flow is:
//! 1. `StartChallenge` creates the (user, challenge) record, idempotently
//! 2. `UpdateProgress` applies a manual delta or absolute count
//! 3. `ApplyCookingEvent` fans one cooked recipe out to every matching active record
//!
//! Records complete themselves the first time a positive target is reached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cookflow_domain::{ChallengeId, DomainError};

mod active;
mod catalog;
mod cooking_event;
mod start;
mod types;
mod update;

pub use active::ListActiveProgress;
pub use catalog::ChallengeCatalog;
pub use cooking_event::{ApplyCookingEvent, CookingTally};
pub use start::{StartChallenge, StartOutcome};
pub use types::{CategorySummary, ChallengeSummary, ProgressSummary};
pub use update::UpdateProgress;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::validation::ValidationError;

/// Container for challenge use cases.
pub struct ChallengeUseCases {
    pub start: Arc<StartChallenge>,
    pub update: Arc<UpdateProgress>,
    pub active: Arc<ListActiveProgress>,
    pub catalog: Arc<ChallengeCatalog>,
}

impl ChallengeUseCases {
    pub fn new(
        start: Arc<StartChallenge>,
        update: Arc<UpdateProgress>,
        active: Arc<ListActiveProgress>,
        catalog: Arc<ChallengeCatalog>,
    ) -> Self {
        Self {
            start,
            update,
            active,
            catalog,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Challenge not found: {0}")]
    ChallengeNotFound(ChallengeId),
    #[error("Challenge {0} has not been started")]
    NotStarted(ChallengeId),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Challenge expired at {ends_at}")]
    Expired { ends_at: DateTime<Utc> },
    #[error("Progress was modified concurrently")]
    Conflict,
    #[error("Domain error: {0}")]
    Domain(DomainError),
    #[error("Repository error: {0}")]
    Repo(RepoError),
}

impl From<RepoError> for ProgressError {
    fn from(error: RepoError) -> Self {
        if error.is_conflict() {
            Self::Conflict
        } else {
            Self::Repo(error)
        }
    }
}

impl From<DomainError> for ProgressError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Expired { ends_at } => Self::Expired { ends_at },
            other => Self::Domain(other),
        }
    }
}
