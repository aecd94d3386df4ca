//! Persisted record shapes and their mapping to domain types.
//!
//! Field names and value spellings follow the blob the tracker has always
//! written, so previously exported data loads unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::import::title_from_url;
use tracker_core::model::{
    Attempt, Difficulty, Playlist, PlaylistName, Question, QuestionUrl, SpeedrunRun, TrackerState,
};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct StateRecord {
    #[serde(default)]
    pub playlists: BTreeMap<String, PlaylistRecord>,
    #[serde(default)]
    pub questions: BTreeMap<String, QuestionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistRecord {
    /// Older blobs can hold blank or null entries for rows imported without a URL.
    #[serde(default)]
    pub urls: Vec<Option<String>>,
    #[serde(default)]
    pub speedrun_history: Vec<SpeedrunRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeedrunRecord {
    pub total_time: u32,
    #[serde(with = "millis_date")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub unaided_attempts: u32,
    #[serde(default)]
    pub completion_status: String,
    #[serde(default)]
    pub history: Vec<AttemptRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttemptRecord {
    #[serde(with = "millis_date")]
    pub date: DateTime<Utc>,
    pub time_think: u32,
    pub time_code: u32,
    pub saw_solution: bool,
    #[serde(default)]
    pub total_time: u32,
    #[serde(default)]
    pub remarks: String,
}

/// Timestamps as JavaScript's `toISOString` writes them: always three
/// fractional digits and a `Z` suffix.
mod millis_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

impl StateRecord {
    pub(crate) fn from_state(state: &TrackerState) -> Self {
        let playlists = state
            .playlists
            .iter()
            .map(|(name, playlist)| (name.to_string(), PlaylistRecord::from_playlist(playlist)))
            .collect();
        let questions = state
            .questions
            .iter()
            .map(|(url, question)| (url.to_string(), QuestionRecord::from_question(question)))
            .collect();
        Self {
            playlists,
            questions,
        }
    }

    /// Convert back into domain state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for blank keys or attempt
    /// timings outside the phase budget.
    pub(crate) fn into_state(self) -> Result<TrackerState, StorageError> {
        let mut state = TrackerState::default();

        for (name, record) in self.playlists {
            let name = PlaylistName::new(name).map_err(ser)?;
            let playlist = record.into_playlist(name.clone());
            state.playlists.insert(name, playlist);
        }

        for (key, record) in self.questions {
            let url = QuestionUrl::new(key).map_err(ser)?;
            let question = record.into_question(url.clone())?;
            state.questions.insert(url, question);
        }

        Ok(state)
    }
}

impl PlaylistRecord {
    fn from_playlist(playlist: &Playlist) -> Self {
        Self {
            urls: playlist
                .urls()
                .iter()
                .map(|url| Some(url.to_string()))
                .collect(),
            speedrun_history: playlist
                .speedrun_history()
                .iter()
                .map(|run| SpeedrunRecord {
                    total_time: run.total_time,
                    date: run.date,
                })
                .collect(),
        }
    }

    fn into_playlist(self, name: PlaylistName) -> Playlist {
        let stored = self.urls.len();
        let urls: Vec<QuestionUrl> = self
            .urls
            .into_iter()
            .flatten()
            .filter_map(|raw| QuestionUrl::new(raw).ok())
            .collect();
        if urls.len() != stored {
            tracing::warn!(
                playlist = %name,
                dropped = stored - urls.len(),
                "skipping blank playlist urls"
            );
        }
        let speedrun_history = self
            .speedrun_history
            .into_iter()
            .map(|run| SpeedrunRun {
                total_time: run.total_time,
                date: run.date,
            })
            .collect();
        Playlist::from_persisted(name, urls, speedrun_history)
    }
}

impl QuestionRecord {
    fn from_question(question: &Question) -> Self {
        Self {
            url: question.url().to_string(),
            title: question.title().to_string(),
            difficulty: question.difficulty().as_str().to_string(),
            topics: question.topics().to_vec(),
            total_attempts: question.total_attempts(),
            unaided_attempts: question.unaided_attempts(),
            completion_status: question.completion_status().as_str().to_string(),
            history: question
                .history()
                .iter()
                .map(|attempt| AttemptRecord {
                    date: attempt.date(),
                    time_think: attempt.time_think(),
                    time_code: attempt.time_code(),
                    saw_solution: attempt.saw_solution(),
                    total_time: attempt.total_time(),
                    remarks: attempt.remarks().to_string(),
                })
                .collect(),
        }
    }

    /// The map key is the identity; the embedded `url` is informational.
    /// Counters and status are re-derived from history.
    fn into_question(self, url: QuestionUrl) -> Result<Question, StorageError> {
        if !self.url.is_empty() && self.url.trim() != url.as_str() {
            tracing::warn!(key = %url, embedded = %self.url, "question url does not match its key");
        }

        let difficulty = if self.difficulty.trim().is_empty() {
            Difficulty::NotAvailable
        } else {
            self.difficulty.parse::<Difficulty>().unwrap_or_else(|_| {
                tracing::warn!(%url, difficulty = %self.difficulty, "unknown difficulty, using N/A");
                Difficulty::NotAvailable
            })
        };

        let title = if self.title.trim().is_empty() {
            title_from_url(&url)
        } else {
            self.title
        };

        let history = self
            .history
            .into_iter()
            .map(|a| Attempt::from_persisted(a.time_think, a.time_code, a.saw_solution, a.remarks, a.date))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ser)?;

        let question =
            Question::from_persisted(url, title, difficulty, self.topics, history).map_err(ser)?;

        if question.total_attempts() != self.total_attempts
            || question.unaided_attempts() != self.unaided_attempts
            || question.completion_status().as_str() != self.completion_status
        {
            tracing::debug!(
                url = %question.url(),
                stored_status = %self.completion_status,
                derived_status = %question.completion_status(),
                "stored counters differ from history, using derived values"
            );
        }

        Ok(question)
    }
}
