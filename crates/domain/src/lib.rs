//! CookFlow domain.
//!
//! Pure challenge rules with no I/O: entities, typed ids and the domain error.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    Category, Challenge, ChallengeProgress, CookingOutcome, ProgressUpdate, UpdateOutcome, User,
};
pub use error::DomainError;
pub use ids::{CategoryId, ChallengeId, ProgressId, RecipeId, UserId};
