use std::sync::Arc;

use storage::repository::StateRepository;
use tracker_core::completion::CompletionSummary;
use tracker_core::model::{
    Attempt, CompletedAttempt, CompletionStatus, PlaylistName, Question, QuestionUrl,
};
use tracker_core::selector::{NextQuestion, select_next};

use super::driver::AttemptTimerHandle;
use crate::Clock;
use crate::error::PracticeError;

/// What a practice session should show next.
#[derive(Debug, Clone, PartialEq)]
pub enum PracticeStep {
    Practice(Question),
    PlaylistComplete,
}

/// Outcome of saving one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAttempt {
    pub url: QuestionUrl,
    pub status: CompletionStatus,
    pub total_attempts: u32,
    pub unaided_attempts: u32,
    /// Unaided attempts still needed before the question counts as completed.
    pub remaining_unaided: u32,
}

/// Orchestrates question selection, attempt timing and attempt persistence.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    state: Arc<dyn StateRepository>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, state: Arc<dyn StateRepository>) -> Self {
        Self { clock, state }
    }

    /// Pick the question to practice next in a playlist.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::PlaylistNotFound` for an unknown playlist.
    pub async fn next_question(&self, playlist: &str) -> Result<PracticeStep, PracticeError> {
        let name = PlaylistName::new(playlist)?;
        let state = self.state.load().await;
        let playlist = state
            .playlist(&name)
            .ok_or_else(|| PracticeError::PlaylistNotFound(name.to_string()))?;

        let step = match select_next(playlist.urls(), &state.questions) {
            NextQuestion::Practice(url) => state
                .question(&url)
                .cloned()
                .map_or(PracticeStep::PlaylistComplete, PracticeStep::Practice),
            NextQuestion::PlaylistComplete => PracticeStep::PlaylistComplete,
        };

        if let PracticeStep::Practice(question) = &step {
            tracing::debug!(playlist = %name, url = %question.url(), "next question selected");
        }
        Ok(step)
    }

    /// Spawn an idle attempt timer.
    #[must_use]
    pub fn start_attempt(&self) -> AttemptTimerHandle {
        AttemptTimerHandle::spawn()
    }

    /// Append a finished attempt to a question's history and persist it.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::QuestionNotFound` for an unknown URL,
    /// `PracticeError::Attempt` for out-of-range timings, and
    /// `PracticeError::Storage` if persistence fails. Nothing is saved on
    /// error.
    pub async fn record_attempt(
        &self,
        url: &QuestionUrl,
        completed: CompletedAttempt,
        remarks: &str,
    ) -> Result<RecordedAttempt, PracticeError> {
        let attempt = Attempt::new(completed, remarks, self.clock.now())?;

        let mut state = self.state.load().await;
        let question = state
            .questions
            .get_mut(url)
            .ok_or_else(|| PracticeError::QuestionNotFound(url.to_string()))?;
        let status = question.record_attempt(attempt);
        let summary = CompletionSummary::from_history(question.history());
        let recorded = RecordedAttempt {
            url: url.clone(),
            status,
            total_attempts: summary.total_attempts,
            unaided_attempts: summary.unaided_attempts,
            remaining_unaided: summary.remaining_unaided(),
        };

        self.state.save(&state).await?;
        tracing::info!(
            %url,
            status = %status,
            think = completed.time_think,
            code = completed.time_code,
            saw_solution = completed.saw_solution,
            "attempt recorded"
        );
        Ok(recorded)
    }
}
