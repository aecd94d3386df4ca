//! Defaulting rules for questions handed over by the import collaborator.

use thiserror::Error;
use url::Url;

use crate::model::{Difficulty, IdError, QuestionUrl};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error(transparent)]
    Url(#[from] IdError),
}

/// One raw row from CSV import or manual entry. Every field but `url` is
/// optional and may be blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRecord {
    pub url: String,
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub topics: Option<String>,
}

/// An import row after defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionImport {
    pub url: QuestionUrl,
    pub title: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    /// Difficulty text that was present but not recognised.
    pub rejected_difficulty: Option<String>,
}

impl ImportRecord {
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Apply the defaulting rules.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Url` if the URL is blank.
    pub fn normalize(self) -> Result<QuestionImport, ImportError> {
        let url = QuestionUrl::new(self.url)?;

        let title = non_blank(self.title).unwrap_or_else(|| title_from_url(&url));

        let (difficulty, rejected_difficulty) = match non_blank(self.difficulty) {
            None => (Difficulty::NotAvailable, None),
            Some(raw) => match raw.parse::<Difficulty>() {
                Ok(difficulty) => (difficulty, None),
                Err(_) => (Difficulty::NotAvailable, Some(raw)),
            },
        };

        let topics = self.topics.as_deref().map(split_topics).unwrap_or_default();

        Ok(QuestionImport {
            url,
            title,
            difficulty,
            topics,
            rejected_difficulty,
        })
    }
}

/// Turn a pasted block of text into URL-only records, one per non-blank line.
#[must_use]
pub fn records_from_url_lines(text: &str) -> Vec<ImportRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ImportRecord::from_url)
        .collect()
}

/// Split a comma separated topic list, dropping empty entries.
#[must_use]
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title-cased slug of the URL's last path segment:
/// `.../problems/two-sum/` becomes `Two Sum`.
#[must_use]
pub fn title_from_url(url: &QuestionUrl) -> String {
    let slug = Url::parse(url.as_str())
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .or_else(|| {
            url.as_str()
                .split('/')
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)
        })
        .unwrap_or_else(|| url.as_str().to_string());

    let title = slug
        .split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        url.as_str().to_string()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let import = ImportRecord::from_url("https://leetcode.com/problems/two-sum/")
            .normalize()
            .unwrap();
        assert_eq!(import.title, "Two Sum");
        assert_eq!(import.difficulty, Difficulty::NotAvailable);
        assert!(import.topics.is_empty());
        assert_eq!(import.rejected_difficulty, None);
    }

    #[test]
    fn provided_fields_are_kept() {
        let import = ImportRecord {
            url: " https://leetcode.com/problems/lru-cache/ ".into(),
            title: Some("LRU Cache".into()),
            difficulty: Some("medium".into()),
            topics: Some(" Hash Table, Linked List ,, Design".into()),
        }
        .normalize()
        .unwrap();

        assert_eq!(import.url.as_str(), "https://leetcode.com/problems/lru-cache/");
        assert_eq!(import.title, "LRU Cache");
        assert_eq!(import.difficulty, Difficulty::Medium);
        assert_eq!(import.topics, vec!["Hash Table", "Linked List", "Design"]);
    }

    #[test]
    fn blank_title_and_unknown_difficulty_are_defaulted() {
        let import = ImportRecord {
            url: "https://leetcode.com/problems/median-of-two-sorted-arrays".into(),
            title: Some("   ".into()),
            difficulty: Some("Brutal".into()),
            topics: None,
        }
        .normalize()
        .unwrap();

        assert_eq!(import.title, "Median Of Two Sorted Arrays");
        assert_eq!(import.difficulty, Difficulty::NotAvailable);
        assert_eq!(import.rejected_difficulty.as_deref(), Some("Brutal"));
    }

    #[test]
    fn title_falls_back_for_unparsable_urls() {
        let url = QuestionUrl::new("problems/valid-anagram/").unwrap();
        assert_eq!(title_from_url(&url), "Valid Anagram");
    }

    #[test]
    fn blank_url_is_rejected() {
        let err = ImportRecord::from_url("  ").normalize().unwrap_err();
        assert_eq!(err, ImportError::Url(IdError::EmptyUrl));
    }

    #[test]
    fn url_lines_skip_blank_lines() {
        let records = records_from_url_lines("a\n\n  b  \n\t\n");
        let urls: Vec<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b"]);
    }
}
