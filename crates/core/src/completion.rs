//! Mastery policy: when does a question count as completed?

use crate::model::{Attempt, CompletionStatus};

/// Unaided attempts needed when the solution was never viewed.
pub const UNAIDED_THRESHOLD: u32 = 3;

/// Unaided attempts needed once the solution has been viewed at least once.
pub const UNAIDED_THRESHOLD_AFTER_SOLUTION: u32 = 4;

/// Counters and status derived from a question's full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionSummary {
    pub total_attempts: u32,
    pub unaided_attempts: u32,
    pub ever_saw_solution: bool,
    pub status: CompletionStatus,
}

impl CompletionSummary {
    /// Derive the summary from scratch. The result depends only on the
    /// multiset of attempts, so it is idempotent and order-independent.
    #[must_use]
    pub fn from_history(history: &[Attempt]) -> Self {
        let mut total_attempts = 0_u32;
        let mut unaided_attempts = 0_u32;
        let mut ever_saw_solution = false;

        for attempt in history {
            total_attempts = total_attempts.saturating_add(1);
            if attempt.saw_solution() {
                ever_saw_solution = true;
            } else {
                unaided_attempts = unaided_attempts.saturating_add(1);
            }
        }

        let status = if total_attempts == 0 {
            CompletionStatus::NotStarted
        } else if unaided_attempts >= required_unaided(ever_saw_solution) {
            CompletionStatus::Completed
        } else {
            CompletionStatus::InProgress
        };

        Self {
            total_attempts,
            unaided_attempts,
            ever_saw_solution,
            status,
        }
    }

    /// Unaided attempts still missing before the question is completed.
    #[must_use]
    pub fn remaining_unaided(&self) -> u32 {
        required_unaided(self.ever_saw_solution).saturating_sub(self.unaided_attempts)
    }
}

/// Threshold of unaided attempts for the given solution-viewing history.
#[must_use]
pub fn required_unaided(ever_saw_solution: bool) -> u32 {
    if ever_saw_solution {
        UNAIDED_THRESHOLD_AFTER_SOLUTION
    } else {
        UNAIDED_THRESHOLD
    }
}
