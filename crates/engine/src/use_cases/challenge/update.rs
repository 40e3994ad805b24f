//! Update progress use case - manual delta or absolute count.

use std::sync::Arc;

use cookflow_domain::{ChallengeId, UpdateOutcome, UserId};

use super::types::ProgressSummary;
use super::ProgressError;
use crate::infrastructure::ports::{ChallengeRepo, ClockPort, ProgressChange, ProgressRepo};
use crate::use_cases::validation::ProgressUpdateInput;

/// Applies a manual progress update.
///
/// Order of checks: payload, challenge, record, window. Terminal records are
/// returned as they are and nothing is written.
pub struct UpdateProgress {
    progress_repo: Arc<dyn ProgressRepo>,
    challenge_repo: Arc<dyn ChallengeRepo>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateProgress {
    pub fn new(
        progress_repo: Arc<dyn ProgressRepo>,
        challenge_repo: Arc<dyn ChallengeRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            progress_repo,
            challenge_repo,
            clock,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        input: &ProgressUpdateInput,
    ) -> Result<ProgressSummary, ProgressError> {
        let update = input.parse()?;

        let challenge = self
            .challenge_repo
            .get(challenge_id)
            .await?
            .ok_or(ProgressError::ChallengeNotFound(challenge_id))?;

        let mut progress = self
            .progress_repo
            .find(user_id, challenge_id)
            .await?
            .ok_or(ProgressError::NotStarted(challenge_id))?;

        let expected_count = progress.completed_count();
        let now = self.clock.now();
        match progress.apply_update(&challenge, update, now)? {
            UpdateOutcome::Unchanged => {
                tracing::debug!(
                    user_id = %user_id,
                    challenge_id = %challenge_id,
                    "Progress already completed, update ignored"
                );
            }
            UpdateOutcome::Applied { completed } => {
                self.progress_repo
                    .update(&ProgressChange {
                        expected_count,
                        progress: progress.clone(),
                    })
                    .await?;
                if completed {
                    tracing::info!(
                        user_id = %user_id,
                        challenge_id = %challenge_id,
                        completed_count = progress.completed_count(),
                        "Challenge completed"
                    );
                }
            }
        }

        Ok(ProgressSummary::new(&progress, &challenge))
    }
}
