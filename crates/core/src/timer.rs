//! Three-phase attempt timer.
//!
//! The machine is a plain `Copy` snapshot and every transition is a pure
//! function `snapshot × action → snapshot`. Wall-clock ticks and user actions
//! are fed in from outside; see `services::practice::driver` for the tokio
//! driver.

use std::fmt;

use thiserror::Error;

use crate::model::CompletedAttempt;

/// Countdown budget of every active phase, in seconds.
pub const PHASE_BUDGET_SECS: u32 = 600;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("action {action} is not allowed while {phase}")]
    InvalidAction {
        phase: TimerPhase,
        action: TimerAction,
    },
}

//
// ─── PHASES & ACTIONS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPhase {
    Idle,
    Thinking,
    Coding,
    Reviewing,
    Finished,
}

impl TimerPhase {
    /// Active phases count down once per second.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            TimerPhase::Thinking | TimerPhase::Coding | TimerPhase::Reviewing
        )
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Thinking => "thinking",
            TimerPhase::Coding => "coding",
            TimerPhase::Reviewing => "reviewing",
            TimerPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Inputs accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// The question link was opened.
    Start,
    /// "Ready to code", "finished coding" or "finished reviewing",
    /// depending on the current phase.
    Advance,
    /// "I need to see the solution".
    SeeSolution,
    /// One second of wall-clock time elapsed.
    Tick,
}

impl fmt::Display for TimerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerAction::Start => "start",
            TimerAction::Advance => "advance",
            TimerAction::SeeSolution => "see-solution",
            TimerAction::Tick => "tick",
        };
        f.write_str(label)
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Complete state of one attempt's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    phase: TimerPhase,
    seconds_remaining: u32,
    elapsed_think: u32,
    elapsed_code: u32,
    saw_solution: bool,
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub snapshot: TimerSnapshot,
    /// Set exactly once, on the transition into `Finished`.
    pub completed: Option<CompletedAttempt>,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

impl TimerSnapshot {
    /// A fresh machine waiting for the start signal.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            phase: TimerPhase::Idle,
            seconds_remaining: PHASE_BUDGET_SECS,
            elapsed_think: 0,
            elapsed_code: 0,
            saw_solution: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub fn elapsed_think(&self) -> u32 {
        self.elapsed_think
    }

    #[must_use]
    pub fn elapsed_code(&self) -> u32 {
        self.elapsed_code
    }

    #[must_use]
    pub fn saw_solution(&self) -> bool {
        self.saw_solution
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }

    /// Apply an action and return the next snapshot.
    ///
    /// Ticks outside an active phase are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidAction` if the action is not valid in the
    /// current phase; the snapshot is left unchanged.
    pub fn apply(self, action: TimerAction) -> Result<Transition, TimerError> {
        match (self.phase, action) {
            (TimerPhase::Idle, TimerAction::Start) => Ok(self.enter(TimerPhase::Thinking).into()),
            (phase, TimerAction::Tick) if phase.is_active() => Ok(self.tick()),
            (TimerPhase::Idle | TimerPhase::Finished, TimerAction::Tick) => Ok(self.into()),
            (TimerPhase::Thinking | TimerPhase::Coding | TimerPhase::Reviewing, TimerAction::Advance) => {
                Ok(self.advance())
            }
            (TimerPhase::Thinking, TimerAction::SeeSolution) => {
                let elapsed = self.phase_elapsed();
                Ok(Self {
                    elapsed_think: elapsed,
                    elapsed_code: 0,
                    saw_solution: true,
                    ..self
                }
                .enter(TimerPhase::Reviewing)
                .into())
            }
            (TimerPhase::Coding, TimerAction::SeeSolution) => {
                let elapsed = self.phase_elapsed();
                Ok(Self {
                    elapsed_code: elapsed,
                    saw_solution: true,
                    ..self
                }
                .enter(TimerPhase::Reviewing)
                .into())
            }
            (phase, action) => Err(TimerError::InvalidAction { phase, action }),
        }
    }

    fn phase_elapsed(&self) -> u32 {
        PHASE_BUDGET_SECS.saturating_sub(self.seconds_remaining)
    }

    fn enter(self, phase: TimerPhase) -> Self {
        Self {
            phase,
            seconds_remaining: PHASE_BUDGET_SECS,
            ..self
        }
    }

    fn tick(self) -> Transition {
        let next = Self {
            seconds_remaining: self.seconds_remaining.saturating_sub(1),
            ..self
        };
        if next.seconds_remaining == 0 {
            // Running out of time is the same as pressing the advance button.
            next.advance()
        } else {
            next.into()
        }
    }

    fn advance(self) -> Transition {
        let elapsed = self.phase_elapsed();
        match self.phase {
            TimerPhase::Thinking => Self {
                elapsed_think: elapsed,
                ..self
            }
            .enter(TimerPhase::Coding)
            .into(),
            TimerPhase::Coding => {
                let done = Self {
                    phase: TimerPhase::Finished,
                    elapsed_code: elapsed,
                    saw_solution: false,
                    ..self
                };
                done.finish()
            }
            TimerPhase::Reviewing => Self {
                phase: TimerPhase::Finished,
                ..self
            }
            .finish(),
            TimerPhase::Idle | TimerPhase::Finished => self.into(),
        }
    }

    fn finish(self) -> Transition {
        Transition {
            snapshot: self,
            completed: Some(CompletedAttempt {
                time_think: self.elapsed_think,
                time_code: self.elapsed_code,
                saw_solution: self.saw_solution,
            }),
        }
    }
}

impl From<TimerSnapshot> for Transition {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            snapshot,
            completed: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
