//! Cooking event use case - fans one cooked recipe out to active progress.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cookflow_domain::{CategoryId, Challenge, ChallengeId, CookingOutcome, UserId};
use serde::Serialize;

use super::ProgressError;
use crate::infrastructure::ports::{ChallengeRepo, ProgressChange, ProgressRepo};

/// Counts reported back to the cook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CookingTally {
    pub progress_updated: u32,
    pub challenges_completed: u32,
}

/// Increments every active record whose challenge accepts the recipe.
///
/// All increments are written as one batch. If another request touched any of
/// the records in between, nothing is written and `ProgressError::Conflict` is
/// returned. The challenge window is not checked on this path.
pub struct ApplyCookingEvent {
    progress_repo: Arc<dyn ProgressRepo>,
    challenge_repo: Arc<dyn ChallengeRepo>,
}

impl ApplyCookingEvent {
    pub fn new(progress_repo: Arc<dyn ProgressRepo>, challenge_repo: Arc<dyn ChallengeRepo>) -> Self {
        Self {
            progress_repo,
            challenge_repo,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        recipe_categories: &HashSet<CategoryId>,
        now: DateTime<Utc>,
    ) -> Result<CookingTally, ProgressError> {
        let active = self.progress_repo.list_active_for_user(user_id).await?;

        let mut challenges: HashMap<ChallengeId, Option<Challenge>> = HashMap::new();
        let mut changes = Vec::new();
        let mut tally = CookingTally::default();

        for mut progress in active {
            let challenge_id = progress.challenge_id();
            if !challenges.contains_key(&challenge_id) {
                let challenge = self.challenge_repo.get(challenge_id).await?;
                challenges.insert(challenge_id, challenge);
            }
            let Some(Some(challenge)) = challenges.get(&challenge_id) else {
                tracing::warn!(
                    user_id = %user_id,
                    challenge_id = %challenge_id,
                    "Active progress references a missing challenge, skipping"
                );
                continue;
            };

            let expected_count = progress.completed_count();
            match progress.record_cooking(challenge, recipe_categories, now) {
                CookingOutcome::Skipped => continue,
                CookingOutcome::Counted { completed } => {
                    tally.progress_updated += 1;
                    if completed {
                        tally.challenges_completed += 1;
                    }
                }
            }
            changes.push(ProgressChange {
                expected_count,
                progress,
            });
        }

        self.progress_repo.update_batch(&changes).await?;

        tracing::info!(
            user_id = %user_id,
            progress_updated = tally.progress_updated,
            challenges_completed = tally.challenges_completed,
            "Cooking event applied"
        );
        Ok(tally)
    }
}
