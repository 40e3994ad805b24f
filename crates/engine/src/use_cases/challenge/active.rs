//! List a user's active (not yet completed) challenges.

use std::sync::Arc;

use cookflow_domain::UserId;

use super::types::ProgressSummary;
use crate::infrastructure::ports::{ChallengeRepo, ProgressRepo, RepoError};

pub struct ListActiveProgress {
    progress_repo: Arc<dyn ProgressRepo>,
    challenge_repo: Arc<dyn ChallengeRepo>,
}

impl ListActiveProgress {
    pub fn new(progress_repo: Arc<dyn ProgressRepo>, challenge_repo: Arc<dyn ChallengeRepo>) -> Self {
        Self {
            progress_repo,
            challenge_repo,
        }
    }

    /// Most recently started first.
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<ProgressSummary>, RepoError> {
        let records = self.progress_repo.list_active_for_user(user_id).await?;

        let mut summaries = Vec::with_capacity(records.len());
        for progress in &records {
            match self.challenge_repo.get(progress.challenge_id()).await? {
                Some(challenge) => summaries.push(ProgressSummary::new(progress, &challenge)),
                None => tracing::warn!(
                    user_id = %user_id,
                    challenge_id = %progress.challenge_id(),
                    "Active progress references a missing challenge, skipping"
                ),
            }
        }
        Ok(summaries)
    }
}
