//! Start challenge use case - creates the (user, challenge) progress record.

use std::sync::Arc;

use cookflow_domain::{ChallengeId, ChallengeProgress, UserId};

use super::types::ProgressSummary;
use super::ProgressError;
use crate::infrastructure::ports::{ChallengeRepo, ClockPort, ProgressRepo, RepoError};

/// Result of starting a challenge.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub progress: ProgressSummary,
    /// False when the user had already started this challenge.
    pub created: bool,
}

/// Starts a challenge for a user.
///
/// Idempotent: a second start returns the existing record untouched. Two
/// concurrent first starts are resolved by the store's unique index; the loser
/// re-reads the winner's record.
pub struct StartChallenge {
    progress_repo: Arc<dyn ProgressRepo>,
    challenge_repo: Arc<dyn ChallengeRepo>,
    clock: Arc<dyn ClockPort>,
}

impl StartChallenge {
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
    ) -> Result<StartOutcome, ProgressError> {
        let challenge = self
            .challenge_repo
            .get(challenge_id)
            .await?
            .ok_or(ProgressError::ChallengeNotFound(challenge_id))?;

        if let Some(existing) = self.progress_repo.find(user_id, challenge_id).await? {
            return Ok(StartOutcome {
                progress: ProgressSummary::new(&existing, &challenge),
                created: false,
            });
        }

        let progress = ChallengeProgress::start(user_id, challenge_id, self.clock.now());
        match self.progress_repo.insert(&progress).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user_id,
                    challenge_id = %challenge_id,
                    "Challenge started"
                );
                Ok(StartOutcome {
                    progress: ProgressSummary::new(&progress, &challenge),
                    created: true,
                })
            }
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(
                    user_id = %user_id,
                    challenge_id = %challenge_id,
                    "Concurrent start detected, returning existing record"
                );
                let existing = self
                    .progress_repo
                    .find(user_id, challenge_id)
                    .await?
                    .ok_or_else(|| RepoError::not_found("ChallengeProgress", challenge_id))?;
                Ok(StartOutcome {
                    progress: ProgressSummary::new(&existing, &challenge),
                    created: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockChallengeRepo, MockClockPort, MockProgressRepo, ProgressChange,
    };
    use crate::infrastructure::sqlite::{SqliteChallengeRepo, SqliteProgressRepo};
    use crate::test_fixtures::{t0, TestDb};
    use chrono::Duration;
    use cookflow_domain::{Challenge, ProgressId};
    use mockall::predicate::*;

    fn challenge_repo_with(challenge: Challenge) -> MockChallengeRepo {
        let mut repo = MockChallengeRepo::new();
        let id = challenge.id();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(challenge.clone())));
        repo
    }

    #[tokio::test]
    async fn unknown_challenge_is_not_found() {
        let mut challenge_repo = MockChallengeRepo::new();
        challenge_repo.expect_get().returning(|_| Ok(None));
        // No progress lookups expected
        let progress_repo = MockProgressRepo::new();
        let clock = MockClockPort::new();

        let use_case = StartChallenge::new(
            Arc::new(progress_repo),
            Arc::new(challenge_repo),
            Arc::new(clock),
        );

        let challenge_id = ChallengeId::new();
        let err = use_case
            .execute(UserId::new(), challenge_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::ChallengeNotFound(id) if id == challenge_id));
    }

    #[tokio::test]
    async fn creates_empty_record_stamped_with_clock() {
        let challenge = Challenge::new("Warm-up").with_target_count(2);
        let challenge_id = challenge.id();
        let user_id = UserId::new();
        let mut progress_repo = MockProgressRepo::new();
        let mut clock = MockClockPort::new();

        progress_repo
            .expect_find()
            .with(eq(user_id), eq(challenge_id))
            .returning(|_, _| Ok(None));
        progress_repo
            .expect_insert()
            .withf(move |p| {
                p.user_id() == user_id
                    && p.challenge_id() == challenge_id
                    && p.completed_count() == 0
                    && p.started_at() == t0()
                    && p.completed_at().is_none()
            })
            .times(1)
            .returning(|_| Ok(()));
        clock.expect_now().returning(t0);

        let use_case = StartChallenge::new(
            Arc::new(progress_repo),
            Arc::new(challenge_repo_with(challenge)),
            Arc::new(clock),
        );

        let outcome = use_case.execute(user_id, challenge_id).await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.progress.started_at, t0());
        assert_eq!(outcome.progress.completed_count, 0);
    }

    #[tokio::test]
    async fn existing_record_is_returned_unchanged() {
        let challenge = Challenge::new("Warm-up").with_target_count(5);
        let challenge_id = challenge.id();
        let user_id = UserId::new();
        let existing = ChallengeProgress::restore(
            ProgressId::new(),
            user_id,
            challenge_id,
            3,
            t0(),
            None,
        );
        let mut progress_repo = MockProgressRepo::new();
        progress_repo
            .expect_find()
            .returning(move |_, _| Ok(Some(existing.clone())));
        // No insert, no clock read
        let clock = MockClockPort::new();

        let use_case = StartChallenge::new(
            Arc::new(progress_repo),
            Arc::new(challenge_repo_with(challenge)),
            Arc::new(clock),
        );

        let outcome = use_case.execute(user_id, challenge_id).await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.progress.completed_count, 3);
        assert_eq!(outcome.progress.started_at, t0());
    }

    #[tokio::test]
    async fn lost_insert_race_returns_winners_record() {
        let challenge = Challenge::new("Warm-up");
        let challenge_id = challenge.id();
        let user_id = UserId::new();
        let winner = ChallengeProgress::restore(
            ProgressId::new(),
            user_id,
            challenge_id,
            0,
            t0() - Duration::seconds(1),
            None,
        );
        let winner_id = winner.id();

        let mut progress_repo = MockProgressRepo::new();
        let mut seq = mockall::Sequence::new();
        progress_repo
            .expect_find()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        progress_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(RepoError::unique_violation(
                    "insert_progress",
                    "UNIQUE constraint failed",
                ))
            });
        progress_repo
            .expect_find()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(winner.clone())));
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(t0);

        let use_case = StartChallenge::new(
            Arc::new(progress_repo),
            Arc::new(challenge_repo_with(challenge)),
            Arc::new(clock),
        );

        let outcome = use_case.execute(user_id, challenge_id).await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.progress.id, winner_id);
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let challenge = Challenge::new("Warm-up");
        let challenge_id = challenge.id();
        let mut progress_repo = MockProgressRepo::new();
        progress_repo
            .expect_find()
            .returning(|_, _| Err(RepoError::database("find_progress", "disk I/O error")));
        let clock = MockClockPort::new();

        let use_case = StartChallenge::new(
            Arc::new(progress_repo),
            Arc::new(challenge_repo_with(challenge)),
            Arc::new(clock),
        );

        let err = use_case
            .execute(UserId::new(), challenge_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::Repo(RepoError::Database { .. })));
    }

    #[tokio::test]
    async fn second_start_keeps_start_time_and_count() {
        let db = TestDb::new().await;
        let user = db.user("cook@example.com").await;
        let challenge = db.challenge(Challenge::new("Any").with_target_count(5)).await;
        let progress_repo = Arc::new(SqliteProgressRepo::new(db.pool.clone()));
        let challenge_repo = Arc::new(SqliteChallengeRepo::new(db.pool.clone()));

        let first = StartChallenge::new(
            progress_repo.clone(),
            challenge_repo.clone(),
            Arc::new(FixedClock(t0())),
        )
        .execute(user, challenge.id())
        .await
        .unwrap();

        let mut bumped = progress_repo
            .find(user, challenge.id())
            .await
            .unwrap()
            .unwrap();
        bumped
            .apply_update(&challenge, cookflow_domain::ProgressUpdate::Delta(2), t0())
            .unwrap();
        progress_repo
            .update(&ProgressChange {
                expected_count: 0,
                progress: bumped,
            })
            .await
            .unwrap();

        let second = StartChallenge::new(
            progress_repo,
            challenge_repo,
            Arc::new(FixedClock(t0() + Duration::days(1))),
        )
        .execute(user, challenge.id())
        .await
        .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.progress.id, first.progress.id);
        assert_eq!(second.progress.started_at, t0());
        assert_eq!(second.progress.completed_count, 2);
    }

    #[tokio::test]
    async fn concurrent_starts_create_exactly_one_record() {
        const STARTS: usize = 8;

        let db = TestDb::new().await;
        let user = db.user("cook@example.com").await;
        let challenge = db.challenge(Challenge::new("Any")).await;
        let use_case = Arc::new(StartChallenge::new(
            Arc::new(SqliteProgressRepo::new(db.pool.clone())),
            Arc::new(SqliteChallengeRepo::new(db.pool.clone())),
            Arc::new(FixedClock(t0())),
        ));

        let handles: Vec<_> = (0..STARTS)
            .map(|_| {
                let use_case = use_case.clone();
                let challenge_id = challenge.id();
                tokio::spawn(async move { use_case.execute(user, challenge_id).await })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(STARTS);
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        let created = outcomes.iter().filter(|o| o.created).count();
        let first_id = outcomes[0].progress.id;
        assert_eq!(created, 1);
        assert!(outcomes.iter().all(|o| o.progress.id == first_id));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM challenge_progress")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
