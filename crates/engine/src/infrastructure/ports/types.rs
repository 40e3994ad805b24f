//! Types exchanged across repository ports.

use cookflow_domain::ChallengeProgress;

/// A guarded progress write, alone or as one row of a batch.
///
/// `expected_count` is the `completed_count` the caller read before mutating.
/// The store applies the write only if the row still holds that count and is
/// still active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressChange {
    pub expected_count: u32,
    pub progress: ChallengeProgress,
}
