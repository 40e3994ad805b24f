//! Domain entities.

mod category;
mod challenge;
mod challenge_progress;
mod user;

pub use category::Category;
pub use challenge::Challenge;
pub use challenge_progress::{ChallengeProgress, CookingOutcome, ProgressUpdate, UpdateOutcome};
pub use user::User;
