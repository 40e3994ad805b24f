//! Challenge entity - count-based cooking goals
//!
//! A challenge asks a user to cook `target_count` recipes, optionally restricted
//! to recipes tagged with one category and optionally time-boxed to a number of
//! days counted from the moment the user starts it.
//!
//! Challenges are owned by the catalog. The progress engine only reads them.

use std::collections::HashSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{Category, CategoryId, ChallengeId};

/// A cooking challenge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    id: ChallengeId,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    /// Length of the window in days, counted from `started_at`. `None` never expires.
    duration_days: Option<u32>,
    /// Number of cooked recipes needed. `None` or zero never auto-completes.
    target_count: Option<u32>,
    /// Only recipes in this category count. `None` accepts every recipe.
    category_id: Option<CategoryId>,
    /// Display data for `category_id`, when the store loaded it.
    category: Option<Category>,
}

impl Challenge {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ChallengeId::new(),
            title: title.into(),
            description: None,
            image_url: None,
            duration_days: None,
            target_count: None,
            category_id: None,
            category: None,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn duration_days(&self) -> Option<u32> {
        self.duration_days
    }

    pub fn target_count(&self) -> Option<u32> {
        self.target_count
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    // === Rules ===

    /// The positive target, if the challenge can complete by count at all.
    pub fn effective_target(&self) -> Option<u32> {
        self.target_count.filter(|target| *target > 0)
    }

    /// Whether `count` satisfies the target. Always false without a positive target.
    pub fn is_target_reached(&self, count: u32) -> bool {
        self.effective_target()
            .is_some_and(|target| count >= target)
    }

    /// Length of the challenge window. Zero days is treated like no limit.
    pub fn window(&self) -> Option<Duration> {
        self.duration_days
            .filter(|days| *days > 0)
            .map(|days| Duration::days(i64::from(days)))
    }

    /// Whether a recipe tagged with `categories` counts toward this challenge.
    pub fn accepts(&self, categories: &HashSet<CategoryId>) -> bool {
        match self.category_id {
            None => true,
            Some(category_id) => categories.contains(&category_id),
        }
    }

    // === Builder Methods ===

    pub fn with_id(mut self, id: ChallengeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }

    pub fn with_target_count(mut self, target: u32) -> Self {
        self.target_count = Some(target);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        if self.category.as_ref().is_some_and(|c| c.id != category_id) {
            self.category = None;
        }
        self.category_id = Some(category_id);
        self
    }

    /// Set the filter category together with its display data.
    pub fn with_category_details(mut self, category: Category) -> Self {
        self.category_id = Some(category.id);
        self.category = Some(category);
        self
    }
}
