use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::completion::CompletionSummary;
use crate::model::attempt::Attempt;
use crate::model::ids::QuestionUrl;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question title cannot be empty")]
    EmptyTitle,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown completion status: {0}")]
    UnknownStatus(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty label attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// No difficulty was supplied on import.
    #[default]
    NotAvailable,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    /// Case-insensitive; accepts the same labels `as_str` produces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "n/a" | "na" => Ok(Self::NotAvailable),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── COMPLETION STATUS ─────────────────────────────────────────────────────────
//

/// Mastery status of a question, always derived from its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompletionStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl CompletionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionStatus::NotStarted => "Not Started",
            CompletionStatus::InProgress => "In Progress",
            CompletionStatus::Completed => "Completed",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, CompletionStatus::Completed)
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionStatus {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(Self::NotStarted),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            _ => Err(QuestionError::UnknownStatus(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A tracked practice problem keyed by its URL.
///
/// Attempt counters and the completion status are never stored independently:
/// they are recomputed from `history` every time the history changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    url: QuestionUrl,
    title: String,
    difficulty: Difficulty,
    topics: Vec<String>,
    history: Vec<Attempt>,
    summary: CompletionSummary,
}

impl Question {
    /// Creates a question with no attempts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyTitle` if the title is blank.
    pub fn new(
        url: QuestionUrl,
        title: impl Into<String>,
        difficulty: Difficulty,
        topics: Vec<String>,
    ) -> Result<Self, QuestionError> {
        Self::from_persisted(url, title, difficulty, topics, Vec::new())
    }

    /// Rehydrate a question from storage. Counters and status are derived
    /// from `history`, whatever the stored values were.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyTitle` if the title is blank.
    pub fn from_persisted(
        url: QuestionUrl,
        title: impl Into<String>,
        difficulty: Difficulty,
        topics: Vec<String>,
        history: Vec<Attempt>,
    ) -> Result<Self, QuestionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestionError::EmptyTitle);
        }
        let summary = CompletionSummary::from_history(&history);
        Ok(Self {
            url,
            title,
            difficulty,
            topics,
            history,
            summary,
        })
    }

    /// Append a finished attempt and recompute counters and status.
    pub fn record_attempt(&mut self, attempt: Attempt) -> CompletionStatus {
        self.history.push(attempt);
        self.summary = CompletionSummary::from_history(&self.history);
        self.summary.status
    }

    /// Replace import metadata, keeping history untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyTitle` if the title is blank.
    pub fn update_metadata(
        &mut self,
        title: impl Into<String>,
        difficulty: Difficulty,
        topics: Vec<String>,
    ) -> Result<(), QuestionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestionError::EmptyTitle);
        }
        self.title = title;
        self.difficulty = difficulty;
        self.topics = topics;
        Ok(())
    }

    #[must_use]
    pub fn url(&self) -> &QuestionUrl {
        &self.url
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.summary.total_attempts
    }

    #[must_use]
    pub fn unaided_attempts(&self) -> u32 {
        self.summary.unaided_attempts
    }

    #[must_use]
    pub fn completion_status(&self) -> CompletionStatus {
        self.summary.status
    }

    /// Whether the most recent attempt needed the solution.
    #[must_use]
    pub fn last_saw_solution(&self) -> bool {
        self.history.last().is_some_and(Attempt::saw_solution)
    }

    /// Mean `total_time` over history in seconds, or `None` without attempts.
    #[must_use]
    pub fn average_time(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let sum: u64 = self.history.iter().map(|a| u64::from(a.total_time())).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum as f64 / self.history.len() as f64)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
