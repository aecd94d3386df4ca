use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::timer::PHASE_BUDGET_SECS;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when an attempt's timings are out of range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("think time must be between 0 and {PHASE_BUDGET_SECS} seconds, got {0}")]
    ThinkTimeOutOfRange(u32),

    #[error("code time must be between 0 and {PHASE_BUDGET_SECS} seconds, got {0}")]
    CodeTimeOutOfRange(u32),
}

//
// ─── COMPLETED ATTEMPT ────────────────────────────────────────────────────────
//

/// Timing outcome emitted by the attempt timer when it reaches `Finished`.
///
/// Remarks and the date are attached later, when the attempt is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedAttempt {
    pub time_think: u32,
    pub time_code: u32,
    pub saw_solution: bool,
}

impl CompletedAttempt {
    #[must_use]
    pub fn total_time(&self) -> u32 {
        self.time_think + self.time_code
    }
}

//
// ─── ATTEMPT ──────────────────────────────────────────────────────────────────
//

/// One history entry of a question. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    time_think: u32,
    time_code: u32,
    saw_solution: bool,
    remarks: String,
    date: DateTime<Utc>,
}

impl Attempt {
    /// Builds an attempt from a finished timer run.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if either timing exceeds the phase budget.
    pub fn new(
        completed: CompletedAttempt,
        remarks: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if completed.time_think > PHASE_BUDGET_SECS {
            return Err(AttemptError::ThinkTimeOutOfRange(completed.time_think));
        }
        if completed.time_code > PHASE_BUDGET_SECS {
            return Err(AttemptError::CodeTimeOutOfRange(completed.time_code));
        }
        Ok(Self {
            time_think: completed.time_think,
            time_code: completed.time_code,
            saw_solution: completed.saw_solution,
            remarks: remarks.into().trim().to_string(),
            date,
        })
    }

    /// Rehydrate an attempt from persisted storage, keeping remarks verbatim.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if either stored timing exceeds the phase budget.
    pub fn from_persisted(
        time_think: u32,
        time_code: u32,
        saw_solution: bool,
        remarks: String,
        date: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        let mut attempt = Self::new(
            CompletedAttempt {
                time_think,
                time_code,
                saw_solution,
            },
            String::new(),
            date,
        )?;
        attempt.remarks = remarks;
        Ok(attempt)
    }

    #[must_use]
    pub fn time_think(&self) -> u32 {
        self.time_think
    }

    #[must_use]
    pub fn time_code(&self) -> u32 {
        self.time_code
    }

    /// Think time plus code time. Review time is never counted.
    #[must_use]
    pub fn total_time(&self) -> u32 {
        self.time_think + self.time_code
    }

    #[must_use]
    pub fn saw_solution(&self) -> bool {
        self.saw_solution
    }

    #[must_use]
    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
