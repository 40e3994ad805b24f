//! Read-only challenge catalog queries.

use std::sync::Arc;

use cookflow_domain::ChallengeId;

use super::types::ChallengeSummary;
use super::ProgressError;
use crate::infrastructure::ports::{ChallengeRepo, RepoError};

pub struct ChallengeCatalog {
    challenge_repo: Arc<dyn ChallengeRepo>,
}

impl ChallengeCatalog {
    pub fn new(challenge_repo: Arc<dyn ChallengeRepo>) -> Self {
        Self { challenge_repo }
    }

    pub async fn list(&self) -> Result<Vec<ChallengeSummary>, RepoError> {
        let challenges = self.challenge_repo.list().await?;
        Ok(challenges.iter().map(ChallengeSummary::from).collect())
    }

    pub async fn get(&self, id: ChallengeId) -> Result<ChallengeSummary, ProgressError> {
        self.challenge_repo
            .get(id)
            .await?
            .as_ref()
            .map(ChallengeSummary::from)
            .ok_or(ProgressError::ChallengeNotFound(id))
    }
}
