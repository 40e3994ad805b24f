//! Challenge progress entity - one user's attempt at one challenge
//!
//! ## Lifecycle
//!
//! - Created with a zero count when the user starts the challenge.
//! - Moved forward by manual updates and by cooking events.
//! - Becomes terminal once `completed_at` is set. Terminal records never change again.
//!
//! Manual updates are rejected once the challenge window has closed. Cooking
//! events are not gated by the window.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{CategoryId, Challenge, ChallengeId, ProgressId, UserId};

/// A manual progress change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Add to the current count. Always positive.
    Delta(u32),
    /// Overwrite the current count.
    SetCount(u32),
}

impl ProgressUpdate {
    /// Build an additive update; the delta must be greater than zero.
    pub fn delta(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::validation("delta must be > 0"));
        }
        u32::try_from(value)
            .map(Self::Delta)
            .map_err(|_| DomainError::validation("delta is too large"))
    }

    /// Build an absolute update; the count must not be negative.
    pub fn set_count(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::validation("completed_count must be >= 0"));
        }
        u32::try_from(value)
            .map(Self::SetCount)
            .map_err(|_| DomainError::validation("completed_count is too large"))
    }
}

/// Result of applying a manual update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record was already terminal; nothing changed.
    Unchanged,
    /// The count changed. `completed` is true when this update completed the challenge.
    Applied { completed: bool },
}

/// Result of offering a cooking event to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookingOutcome {
    /// Terminal record, or the recipe is outside the challenge category.
    Skipped,
    /// The count went up by one.
    Counted { completed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    id: ProgressId,
    user_id: UserId,
    challenge_id: ChallengeId,
    completed_count: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ChallengeProgress {
    /// A fresh record for a user starting a challenge now.
    pub fn start(user_id: UserId, challenge_id: ChallengeId, now: DateTime<Utc>) -> Self {
        Self {
            id: ProgressId::new(),
            user_id,
            challenge_id,
            completed_count: 0,
            started_at: now,
            completed_at: None,
        }
    }

    /// Rebuild a record from persisted state.
    pub fn restore(
        id: ProgressId,
        user_id: UserId,
        challenge_id: ChallengeId,
        completed_count: u32,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            challenge_id,
            completed_count,
            started_at,
            completed_at,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ProgressId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn challenge_id(&self) -> ChallengeId {
        self.challenge_id
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    // === Derived state ===

    /// Terminal records have a completion stamp and are frozen.
    pub fn is_terminal(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Completion as shown to users: stamped, or the target is already met.
    pub fn is_completed(&self, challenge: &Challenge) -> bool {
        self.is_terminal() || challenge.is_target_reached(self.completed_count)
    }

    /// End of the challenge window, if the challenge has one.
    pub fn ends_at(&self, challenge: &Challenge) -> Option<DateTime<Utc>> {
        challenge.window().map(|window| self.started_at + window)
    }

    /// Whether the window closed before this record was completed.
    pub fn is_expired(&self, challenge: &Challenge, now: DateTime<Utc>) -> bool {
        !self.is_terminal() && self.ends_at(challenge).is_some_and(|ends_at| now > ends_at)
    }

    // === Transitions ===

    /// Apply a manual update.
    ///
    /// Terminal records are left untouched. Expired records reject the update
    /// without mutation.
    pub fn apply_update(
        &mut self,
        challenge: &Challenge,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, DomainError> {
        if self.is_terminal() {
            return Ok(UpdateOutcome::Unchanged);
        }

        if self.is_expired(challenge, now) {
            if let Some(ends_at) = self.ends_at(challenge) {
                return Err(DomainError::expired(ends_at));
            }
        }

        self.completed_count = match update {
            ProgressUpdate::SetCount(count) => count,
            ProgressUpdate::Delta(delta) => self
                .completed_count
                .checked_add(delta)
                .ok_or_else(|| DomainError::constraint("completed count overflow"))?,
        };

        let completed = self.complete_if_target_reached(challenge, now);
        Ok(UpdateOutcome::Applied { completed })
    }

    /// Count one cooked recipe toward this record.
    ///
    /// Not gated by the challenge window.
    pub fn record_cooking(
        &mut self,
        challenge: &Challenge,
        recipe_categories: &HashSet<CategoryId>,
        now: DateTime<Utc>,
    ) -> CookingOutcome {
        if self.is_terminal() || !challenge.accepts(recipe_categories) {
            return CookingOutcome::Skipped;
        }

        self.completed_count = self.completed_count.saturating_add(1);
        let completed = self.complete_if_target_reached(challenge, now);
        CookingOutcome::Counted { completed }
    }

    fn complete_if_target_reached(&mut self, challenge: &Challenge, now: DateTime<Utc>) -> bool {
        if self.completed_at.is_none() && challenge.is_target_reached(self.completed_count) {
            self.completed_at = Some(now);
            return true;
        }
        false
    }
}
