//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{ChallengeRepo, ClockPort, ProgressRepo, RecipeRepo, UserRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases;
use crate::use_cases::challenge::{
    ApplyCookingEvent, ChallengeCatalog, ListActiveProgress, StartChallenge, UpdateProgress,
};
use crate::use_cases::cooking::CompleteCooking;

/// Main application state.
///
/// Holds all repository ports and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
pub struct Repositories {
    pub progress: Arc<dyn ProgressRepo>,
    pub challenge: Arc<dyn ChallengeRepo>,
    pub recipe: Arc<dyn RecipeRepo>,
    pub user: Arc<dyn UserRepo>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            progress: repos.progress,
            challenge: repos.challenge,
            recipe: repos.recipe,
            user: repos.user,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub challenge: use_cases::ChallengeUseCases,
    pub cooking: use_cases::CookingUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: Repositories, clock: Arc<dyn ClockPort>) -> Self {
        let progress_repo = repositories.progress.clone();
        let challenge_repo = repositories.challenge.clone();
        let recipe_repo = repositories.recipe.clone();

        let cooking_event = Arc::new(ApplyCookingEvent::new(
            progress_repo.clone(),
            challenge_repo.clone(),
        ));

        let challenge = use_cases::ChallengeUseCases::new(
            Arc::new(StartChallenge::new(
                progress_repo.clone(),
                challenge_repo.clone(),
                clock.clone(),
            )),
            Arc::new(UpdateProgress::new(
                progress_repo.clone(),
                challenge_repo.clone(),
                clock.clone(),
            )),
            Arc::new(ListActiveProgress::new(progress_repo, challenge_repo.clone())),
            Arc::new(ChallengeCatalog::new(challenge_repo)),
        );

        let cooking = use_cases::CookingUseCases::new(Arc::new(CompleteCooking::new(
            recipe_repo,
            cooking_event,
            clock,
        )));

        Self {
            repositories,
            use_cases: UseCases { challenge, cooking },
        }
    }
}
