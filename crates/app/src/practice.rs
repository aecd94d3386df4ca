//! Interactive practice loop on stdin/stdout.

use std::error::Error;

use services::{AttemptTimerHandle, PracticeError, PracticeService, PracticeStep};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracker_core::model::CompletedAttempt;
use tracker_core::time::format_countdown;
use tracker_core::timer::TimerPhase;

use crate::render;

pub async fn run(practice: &PracticeService, playlist: &str) -> Result<(), Box<dyn Error>> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let question = match practice.next_question(playlist).await? {
            PracticeStep::Practice(question) => question,
            PracticeStep::PlaylistComplete => {
                println!("Playlist complete! Every question is mastered, ready for a speedrun.");
                return Ok(());
            }
        };

        render::question(&question);
        println!("Open the link, then press Enter to start the timer (q to stop).");
        match input.next_line().await? {
            None => return Ok(()),
            Some(line) if line.trim().eq_ignore_ascii_case("q") => return Ok(()),
            Some(_) => {}
        }

        let Some(completed) = time_attempt(practice.start_attempt(), &mut input).await? else {
            println!("Attempt discarded.");
            return Ok(());
        };

        println!("Remarks (optional), then Enter:");
        let remarks = input.next_line().await?.unwrap_or_default();
        let recorded = practice
            .record_attempt(question.url(), completed, &remarks)
            .await?;
        render::recorded(&recorded);
    }
}

/// Drive one attempt timer from keyboard input. `None` means the attempt
/// was abandoned and the handle dropped.
async fn time_attempt<R>(
    handle: AttemptTimerHandle,
    input: &mut Lines<R>,
) -> Result<Option<CompletedAttempt>, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    let mut updates = handle.subscribe();
    let mut shown = TimerPhase::Idle;
    if handle.start().is_err() {
        return Ok(handle.finished().await);
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                if snapshot.phase() != shown {
                    shown = snapshot.phase();
                    render::phase(&snapshot);
                }
                if snapshot.is_finished() {
                    break;
                }
            }
            line = input.next_line() => {
                match apply_key(&handle, line?.as_deref()) {
                    Key::Handled => {}
                    Key::Discard => return Ok(None),
                    Key::TimerFinished => break,
                }
            }
        }
    }

    Ok(handle.finished().await)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Handled,
    Discard,
    /// The timer task already ended; its attempt is waiting in the handle.
    TimerFinished,
}

fn apply_key(handle: &AttemptTimerHandle, line: Option<&str>) -> Key {
    let sent = match line.map(str::trim) {
        None | Some("q" | "Q") => return Key::Discard,
        Some("s" | "S") => handle.see_solution(),
        Some("t" | "T") => {
            println!(
                "{} left",
                format_countdown(handle.snapshot().seconds_remaining())
            );
            Ok(())
        }
        Some(_) => handle.advance(),
    };
    match sent {
        Ok(()) => Key::Handled,
        Err(PracticeError::TimerStopped) => Key::TimerFinished,
        Err(err) => {
            tracing::warn!(error = %err, "timer action failed");
            Key::Handled
        }
    }
}
