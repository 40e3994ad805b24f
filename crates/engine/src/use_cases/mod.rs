//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across ports to fulfill user stories.

pub mod challenge;
pub mod cooking;
pub mod validation;

// Re-export main types
pub use challenge::ChallengeUseCases;
pub use cooking::CookingUseCases;
