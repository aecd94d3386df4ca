//! Progress figures shown on the dashboard.

use crate::model::{CompletionStatus, Difficulty, Playlist, QuestionUrl, TrackerState};

/// Totals across every tracked question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverallStats {
    pub total_questions: usize,
    pub completed_questions: usize,
    pub total_attempts: u64,
    pub completion_percent: u8,
}

impl OverallStats {
    #[must_use]
    pub fn from_state(state: &TrackerState) -> Self {
        let total_questions = state.questions.len();
        let completed_questions = state
            .questions
            .values()
            .filter(|q| q.completion_status().is_completed())
            .count();
        let total_attempts = state
            .questions
            .values()
            .map(|q| u64::from(q.total_attempts()))
            .sum();

        Self {
            total_questions,
            completed_questions,
            total_attempts,
            completion_percent: percent(completed_questions, total_questions),
        }
    }
}

/// One line of the playlist sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistProgress {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub completion_percent: u8,
}

impl PlaylistProgress {
    /// Missing question records count as not completed.
    #[must_use]
    pub fn for_playlist(playlist: &Playlist, state: &TrackerState) -> Self {
        let total = playlist.urls().len();
        let completed = playlist
            .urls()
            .iter()
            .filter(|url| is_completed(state, url))
            .count();
        Self {
            name: playlist.name().to_string(),
            total,
            completed,
            completion_percent: percent(completed, total),
        }
    }

    /// Every URL resolves to a completed question: ready for a speedrun.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// One row of the playlist details table.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    pub url: QuestionUrl,
    pub title: String,
    pub difficulty: Difficulty,
    pub status: CompletionStatus,
    pub total_attempts: u32,
    /// Mean attempt time in seconds, 0 without history.
    pub average_time: f64,
}

/// Details view of one playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDetails {
    pub name: String,
    pub best_speedrun: Option<u32>,
    pub rows: Vec<QuestionRow>,
}

impl PlaylistDetails {
    /// URLs without a question record are left out of `rows`.
    #[must_use]
    pub fn for_playlist(playlist: &Playlist, state: &TrackerState) -> Self {
        let rows = state
            .playlist_questions(playlist)
            .map(|q| QuestionRow {
                url: q.url().clone(),
                title: q.title().to_string(),
                difficulty: q.difficulty(),
                status: q.completion_status(),
                total_attempts: q.total_attempts(),
                average_time: q.average_time().unwrap_or(0.0),
            })
            .collect();
        Self {
            name: playlist.name().to_string(),
            best_speedrun: playlist.best_speedrun(),
            rows,
        }
    }
}

fn is_completed(state: &TrackerState, url: &QuestionUrl) -> bool {
    state
        .question(url)
        .is_some_and(|q| q.completion_status().is_completed())
}

/// Rounded percentage, 0 when `total` is 0.
#[must_use]
pub fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (part.min(total) * 200 + total) / (2 * total);
    u8::try_from(scaled).unwrap_or(100)
}
