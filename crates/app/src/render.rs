//! Plain-text views printed by the binary.

use services::RecordedAttempt;
use tracker_core::model::Question;
use tracker_core::stats::{OverallStats, PlaylistDetails, PlaylistProgress};
use tracker_core::time::{format_countdown, format_duration};
use tracker_core::timer::{TimerPhase, TimerSnapshot};

pub fn playlists(rows: &[PlaylistProgress]) {
    if rows.is_empty() {
        println!("No playlists yet. Create one with `tracker add`.");
        return;
    }
    for row in rows {
        let next = if row.is_complete() { "speedrun" } else { "practice" };
        println!(
            "{:<32} {:>3}/{:<3} {:>3}%  {next}",
            row.name, row.completed, row.total, row.completion_percent
        );
    }
}

pub fn overall(stats: &OverallStats) {
    println!("Questions tracked: {}", stats.total_questions);
    println!(
        "Completed:         {} ({}%)",
        stats.completed_questions, stats.completion_percent
    );
    println!("Attempts:          {}", stats.total_attempts);
}

pub fn details(details: &PlaylistDetails) {
    println!("{}", details.name);
    if let Some(best) = details.best_speedrun {
        println!("Best speedrun: {}", format_duration(f64::from(best)));
    }
    println!(
        "{:<40} {:<6} {:<12} {:>8} {:>10}",
        "Title", "Diff", "Status", "Attempts", "Avg time"
    );
    for row in &details.rows {
        println!(
            "{:<40} {:<6} {:<12} {:>8} {:>10}",
            row.title,
            row.difficulty.as_str(),
            row.status.as_str(),
            row.total_attempts,
            format_duration(row.average_time)
        );
    }
}

pub fn question(question: &Question) {
    println!();
    println!("{} [{}]", question.title(), question.difficulty());
    println!("  {}", question.url());
    if !question.topics().is_empty() {
        println!("  topics: {}", question.topics().join(", "));
    }
    println!(
        "  {} attempt(s), {} unaided, {}",
        question.total_attempts(),
        question.unaided_attempts(),
        question.completion_status()
    );
}

pub fn phase(snapshot: &TimerSnapshot) {
    match snapshot.phase() {
        TimerPhase::Idle => {}
        TimerPhase::Thinking => println!(
            "Thinking ({}). Enter: ready to code, s: see solution, t: time left, q: discard",
            format_countdown(snapshot.seconds_remaining())
        ),
        TimerPhase::Coding => println!(
            "Coding ({}). Enter: finished coding, s: see solution, t: time left, q: discard",
            format_countdown(snapshot.seconds_remaining())
        ),
        TimerPhase::Reviewing => println!(
            "Reviewing the solution ({}). Enter: finished reviewing, q: discard",
            format_countdown(snapshot.seconds_remaining())
        ),
        TimerPhase::Finished => println!(
            "Done. Thinking {}, coding {}{}",
            format_countdown(snapshot.elapsed_think()),
            format_countdown(snapshot.elapsed_code()),
            if snapshot.saw_solution() {
                ", solution viewed"
            } else {
                ""
            }
        ),
    }
}

pub fn recorded(recorded: &RecordedAttempt) {
    println!(
        "Saved. {} ({} attempt(s), {} unaided).",
        recorded.status, recorded.total_attempts, recorded.unaided_attempts
    );
    if recorded.remaining_unaided > 0 {
        println!(
            "{} more unaided attempt(s) to master it.",
            recorded.remaining_unaided
        );
    }
}
