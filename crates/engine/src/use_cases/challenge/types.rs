//! Domain types for challenge use cases.
//!
//! These DTOs carry derived state (`is_completed`, `ends_at`) alongside the
//! stored fields. JSON serialization happens at the API boundary layer.

use chrono::{DateTime, Utc};
use cookflow_domain::{
    Category, CategoryId, Challenge, ChallengeId, ChallengeProgress, ProgressId,
};
use serde::{Deserialize, Serialize};

/// Category shown with a challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Summary of a challenge for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub id: ChallengeId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_days: Option<u32>,
    pub target_count: Option<u32>,
    pub category_id: Option<CategoryId>,
    /// `None` when the challenge has no category or it was not loaded.
    pub category: Option<CategorySummary>,
}

impl From<&Challenge> for ChallengeSummary {
    fn from(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id(),
            title: challenge.title().to_string(),
            description: challenge.description().map(str::to_string),
            image_url: challenge.image_url().map(str::to_string),
            duration_days: challenge.duration_days(),
            target_count: challenge.target_count(),
            category_id: challenge.category_id(),
            category: challenge.category().map(CategorySummary::from),
        }
    }
}

/// Summary of one user's progress on a challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub id: ProgressId,
    pub challenge: ChallengeSummary,
    pub completed_count: u32,
    pub target_count: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Stamped, or a positive target is already met.
    pub is_completed: bool,
    /// End of the window, when the challenge has a duration.
    pub ends_at: Option<DateTime<Utc>>,
}

impl ProgressSummary {
    pub fn new(progress: &ChallengeProgress, challenge: &Challenge) -> Self {
        Self {
            id: progress.id(),
            challenge: ChallengeSummary::from(challenge),
            completed_count: progress.completed_count(),
            target_count: challenge.target_count(),
            started_at: progress.started_at(),
            completed_at: progress.completed_at(),
            is_completed: progress.is_completed(challenge),
            ends_at: progress.ends_at(challenge),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::t0;
    use chrono::Duration;
    use cookflow_domain::UserId;

    #[test]
    fn summary_derives_window_and_completion() {
        let challenge = Challenge::new("Week").with_duration_days(7).with_target_count(2);
        let progress = ChallengeProgress::restore(
            ProgressId::new(),
            UserId::new(),
            challenge.id(),
            2,
            t0(),
            None,
        );

        let summary = ProgressSummary::new(&progress, &challenge);

        assert!(summary.is_completed);
        assert_eq!(summary.ends_at, Some(t0() + Duration::days(7)));
        assert_eq!(summary.target_count, Some(2));
    }

    #[test]
    fn zero_duration_has_no_end() {
        let challenge = Challenge::new("Open").with_duration_days(0);
        let progress = ChallengeProgress::start(UserId::new(), challenge.id(), t0());

        let summary = ProgressSummary::new(&progress, &challenge);

        assert_eq!(summary.ends_at, None);
        assert!(!summary.is_completed);
    }

    #[test]
    fn challenge_summary_nests_category() {
        let category = Category {
            id: CategoryId::new(),
            name: "Desserts".to_string(),
            slug: Some("dessert".to_string()),
        };
        let challenge = Challenge::new("Sweet tooth").with_category_details(category.clone());

        let summary = ChallengeSummary::from(&challenge);

        assert_eq!(summary.category_id, Some(category.id));
        assert_eq!(
            summary.category,
            Some(CategorySummary {
                id: category.id,
                name: "Desserts".to_string(),
                slug: Some("dessert".to_string()),
            })
        );
        assert_eq!(ChallengeSummary::from(&Challenge::new("Plain")).category, None);
    }
}
