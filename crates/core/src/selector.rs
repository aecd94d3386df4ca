//! Next-question policy for a practice session.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::model::{Question, QuestionUrl};

/// What the session should present next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Practice(QuestionUrl),
    PlaylistComplete,
}

impl NextQuestion {
    #[must_use]
    pub fn url(&self) -> Option<&QuestionUrl> {
        match self {
            NextQuestion::Practice(url) => Some(url),
            NextQuestion::PlaylistComplete => None,
        }
    }
}

/// Pick the next question of a playlist.
///
/// Completed questions are never offered. Unattempted questions come first,
/// in playlist order. Otherwise the ranking surfaces questions whose last
/// attempt needed the solution, then those with fewer unaided attempts, then
/// those with the highest average time. URLs without a question record are
/// skipped, and a repeated URL only counts at its first position.
#[must_use]
pub fn select_next(
    playlist_urls: &[QuestionUrl],
    questions: &BTreeMap<QuestionUrl, Question>,
) -> NextQuestion {
    let mut seen = HashSet::new();
    let unsolved: Vec<&Question> = playlist_urls
        .iter()
        .filter(|url| seen.insert(*url))
        .filter_map(|url| questions.get(url))
        .filter(|q| !q.completion_status().is_completed())
        .collect();

    if let Some(fresh) = unsolved.iter().find(|q| q.total_attempts() == 0) {
        return NextQuestion::Practice(fresh.url().clone());
    }

    let mut ranked = unsolved;
    // `sort_by` is stable, so ties keep playlist order.
    ranked.sort_by(|a, b| practice_priority(a, b));

    ranked
        .first()
        .map_or(NextQuestion::PlaylistComplete, |q| {
            NextQuestion::Practice(q.url().clone())
        })
}

/// Ordering for attempted, unsolved questions; `Less` is picked first.
fn practice_priority(a: &Question, b: &Question) -> Ordering {
    b.last_saw_solution()
        .cmp(&a.last_saw_solution())
        .then_with(|| a.unaided_attempts().cmp(&b.unaided_attempts()))
        .then_with(|| {
            let avg_a = a.average_time().unwrap_or(0.0);
            let avg_b = b.average_time().unwrap_or(0.0);
            avg_b.total_cmp(&avg_a)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attempt, CompletedAttempt, Difficulty};
    use crate::time::fixed_now;

    fn url(slug: &str) -> QuestionUrl {
        QuestionUrl::new(format!("https://leetcode.com/problems/{slug}/")).unwrap()
    }

    fn question(slug: &str, attempts: &[(u32, bool)]) -> Question {
        let history = attempts
            .iter()
            .map(|&(total, saw_solution)| {
                Attempt::new(
                    CompletedAttempt {
                        time_think: total / 2,
                        time_code: total - total / 2,
                        saw_solution,
                    },
                    "",
                    fixed_now(),
                )
                .unwrap()
            })
            .collect();
        Question::from_persisted(url(slug), slug, Difficulty::Medium, Vec::new(), history).unwrap()
    }

    fn store(questions: Vec<Question>) -> BTreeMap<QuestionUrl, Question> {
        questions.into_iter().map(|q| (q.url().clone(), q)).collect()
    }

    #[test]
    fn empty_playlist_is_complete() {
        assert_eq!(select_next(&[], &BTreeMap::new()), NextQuestion::PlaylistComplete);
    }

    #[test]
    fn all_completed_is_complete() {
        let questions = store(vec![
            question("a", &[(100, false), (100, false), (100, false)]),
            question("b", &[(50, false), (50, false), (50, false)]),
        ]);
        let next = select_next(&[url("a"), url("b")], &questions);
        assert_eq!(next, NextQuestion::PlaylistComplete);
        assert_eq!(next.url(), None);
    }

    #[test]
    fn unattempted_questions_come_first_in_playlist_order() {
        let questions = store(vec![
            question("attempted", &[(500, true)]),
            question("z-fresh", &[]),
            question("a-fresh", &[]),
        ]);
        let playlist = [url("attempted"), url("z-fresh"), url("a-fresh")];
        assert_eq!(
            select_next(&playlist, &questions),
            NextQuestion::Practice(url("z-fresh"))
        );
    }

    #[test]
    fn last_solution_view_outranks_unaided_count() {
        let questions = store(vec![
            question("clean", &[(100, false)]),
            question("peeked", &[(100, false), (100, false), (10, true)]),
        ]);
        assert_eq!(
            select_next(&[url("clean"), url("peeked")], &questions),
            NextQuestion::Practice(url("peeked"))
        );
    }

    #[test]
    fn fewer_unaided_attempts_rank_higher() {
        let questions = store(vec![
            question("two", &[(100, false), (100, false)]),
            question("one", &[(100, false)]),
        ]);
        assert_eq!(
            select_next(&[url("two"), url("one")], &questions),
            NextQuestion::Practice(url("one"))
        );
    }

    #[test]
    fn slower_average_breaks_ties() {
        let questions = store(vec![
            question("fast", &[(60, false)]),
            question("slow", &[(300, false)]),
        ]);
        assert_eq!(
            select_next(&[url("fast"), url("slow")], &questions),
            NextQuestion::Practice(url("slow"))
        );
    }

    #[test]
    fn full_ties_keep_playlist_order() {
        let questions = store(vec![
            question("first", &[(120, false)]),
            question("second", &[(120, false)]),
        ]);
        assert_eq!(
            select_next(&[url("second"), url("first")], &questions),
            NextQuestion::Practice(url("second"))
        );
    }

    #[test]
    fn missing_question_records_are_skipped() {
        let questions = store(vec![question("known", &[(100, false)])]);
        assert_eq!(
            select_next(&[url("ghost"), url("known")], &questions),
            NextQuestion::Practice(url("known"))
        );
        assert_eq!(
            select_next(&[url("ghost")], &questions),
            NextQuestion::PlaylistComplete
        );
    }

    #[test]
    fn completed_questions_are_never_repeated() {
        let questions = store(vec![
            question("done", &[(10, false), (10, false), (10, false)]),
            question("open", &[(10, false), (10, false)]),
        ]);
        assert_eq!(
            select_next(&[url("done"), url("open")], &questions),
            NextQuestion::Practice(url("open"))
        );
    }
}
