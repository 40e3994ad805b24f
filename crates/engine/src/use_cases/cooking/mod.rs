//! Cooking use cases.
//!
//! Entry point for "I just cooked this recipe". Resolves the recipe's
//! categories and hands them to the progress engine.

use std::sync::Arc;

use cookflow_domain::{RecipeId, UserId};

use crate::infrastructure::ports::{ClockPort, RecipeRepo, RepoError};
use crate::use_cases::challenge::{ApplyCookingEvent, CookingTally, ProgressError};

/// Container for cooking use cases.
pub struct CookingUseCases {
    pub complete: Arc<CompleteCooking>,
}

impl CookingUseCases {
    pub fn new(complete: Arc<CompleteCooking>) -> Self {
        Self { complete }
    }
}

pub struct CompleteCooking {
    recipe_repo: Arc<dyn RecipeRepo>,
    cooking_event: Arc<ApplyCookingEvent>,
    clock: Arc<dyn ClockPort>,
}

impl CompleteCooking {
    pub fn new(
        recipe_repo: Arc<dyn RecipeRepo>,
        cooking_event: Arc<ApplyCookingEvent>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            recipe_repo,
            cooking_event,
            clock,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<CookingTally, CookingError> {
        let categories = self
            .recipe_repo
            .category_ids(recipe_id)
            .await?
            .ok_or(CookingError::RecipeNotFound(recipe_id))?;

        tracing::debug!(
            user_id = %user_id,
            recipe_id = %recipe_id,
            categories = categories.len(),
            "Recording cooked recipe"
        );

        Ok(self
            .cooking_event
            .execute(user_id, &categories, self.clock.now())
            .await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CookingError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockChallengeRepo, MockProgressRepo, MockRecipeRepo, ProgressRepo,
    };
    use crate::infrastructure::sqlite::SqliteRepositories;
    use crate::test_fixtures::{t0, TestDb};
    use crate::use_cases::challenge::StartChallenge;
    use cookflow_domain::Challenge;
    use mockall::predicate::*;

    #[tokio::test]
    async fn unknown_recipe_touches_no_progress() {
        let mut recipe_repo = MockRecipeRepo::new();
        recipe_repo.expect_category_ids().returning(|_| Ok(None));
        // No progress or catalog calls expected
        let cooking_event = ApplyCookingEvent::new(
            Arc::new(MockProgressRepo::new()),
            Arc::new(MockChallengeRepo::new()),
        );

        let use_case = CompleteCooking::new(
            Arc::new(recipe_repo),
            Arc::new(cooking_event),
            Arc::new(FixedClock(t0())),
        );

        let recipe_id = RecipeId::new();
        let err = use_case
            .execute(UserId::new(), recipe_id)
            .await
            .unwrap_err();

        assert!(matches!(err, CookingError::RecipeNotFound(id) if id == recipe_id));
    }

    #[tokio::test]
    async fn event_time_comes_from_clock() {
        let user_id = UserId::new();
        let recipe_id = RecipeId::new();
        let challenge = Challenge::new("One").with_target_count(1);
        let record = cookflow_domain::ChallengeProgress::start(user_id, challenge.id(), t0());

        let mut recipe_repo = MockRecipeRepo::new();
        recipe_repo
            .expect_category_ids()
            .with(eq(recipe_id))
            .returning(|_| Ok(Some(Default::default())));
        let mut progress_repo = MockProgressRepo::new();
        progress_repo
            .expect_list_active_for_user()
            .returning(move |_| Ok(vec![record.clone()]));
        let later = t0() + chrono::Duration::minutes(20);
        progress_repo
            .expect_update_batch()
            .withf(move |changes| changes[0].progress.completed_at() == Some(later))
            .times(1)
            .returning(|_| Ok(()));
        let mut challenge_repo = MockChallengeRepo::new();
        challenge_repo
            .expect_get()
            .returning(move |_| Ok(Some(challenge.clone())));

        let use_case = CompleteCooking::new(
            Arc::new(recipe_repo),
            Arc::new(ApplyCookingEvent::new(
                Arc::new(progress_repo),
                Arc::new(challenge_repo),
            )),
            Arc::new(FixedClock(later)),
        );

        let tally = use_case.execute(user_id, recipe_id).await.unwrap();

        assert_eq!(tally.challenges_completed, 1);
    }

    #[tokio::test]
    async fn chicken_recipe_feeds_matching_challenges_end_to_end() {
        let db = TestDb::new().await;
        let user = db.user("cook@example.com").await;
        let chicken = db.category("Chicken", "chicken").await;
        let dessert = db.category("Desserts", "dessert").await;
        let chicken_dish = db.recipe(user, "Cheesy chicken", &[chicken]).await;
        let cake = db.recipe(user, "Simple dessert", &[dessert]).await;
        let a = db
            .challenge(Challenge::new("Chicken marathon").with_category(chicken).with_target_count(3))
            .await;
        let b = db.challenge(Challenge::new("Warm-up").with_target_count(2)).await;

        let repos = SqliteRepositories::new(db.pool.clone());
        let clock = Arc::new(FixedClock(t0()));
        let start = StartChallenge::new(repos.progress.clone(), repos.challenge.clone(), clock.clone());
        start.execute(user, a.id()).await.unwrap();
        start.execute(user, b.id()).await.unwrap();

        let use_case = CompleteCooking::new(
            repos.recipe.clone(),
            Arc::new(ApplyCookingEvent::new(
                repos.progress.clone(),
                repos.challenge.clone(),
            )),
            clock,
        );

        let first = use_case.execute(user, chicken_dish).await.unwrap();
        let second = use_case.execute(user, cake).await.unwrap();

        assert_eq!((first.progress_updated, first.challenges_completed), (2, 0));
        assert_eq!((second.progress_updated, second.challenges_completed), (1, 1));

        let a_record = repos.progress.find(user, a.id()).await.unwrap().unwrap();
        let b_record = repos.progress.find(user, b.id()).await.unwrap().unwrap();
        assert_eq!(a_record.completed_count(), 1);
        assert_eq!(b_record.completed_count(), 2);
        assert_eq!(b_record.completed_at(), Some(t0()));
    }
}
