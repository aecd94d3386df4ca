//! Tokio driver feeding wall-clock ticks and user actions into the attempt
//! timer.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracker_core::model::CompletedAttempt;
use tracker_core::timer::{TimerAction, TimerSnapshot};

use crate::error::PracticeError;

const TICK: Duration = Duration::from_secs(1);

/// Owner of one running attempt timer.
///
/// Dropping the handle aborts the timer task and discards the attempt.
pub struct AttemptTimerHandle {
    actions: mpsc::UnboundedSender<TimerAction>,
    snapshots: watch::Receiver<TimerSnapshot>,
    completed: oneshot::Receiver<CompletedAttempt>,
    task: JoinHandle<()>,
}

impl AttemptTimerHandle {
    /// Spawn a timer task for a fresh idle machine.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::idle());
        let (completed_tx, completed_rx) = oneshot::channel();
        let task = tokio::spawn(run_timer(action_rx, snapshot_tx, completed_tx));
        Self {
            actions: action_tx,
            snapshots: snapshot_rx,
            completed: completed_rx,
            task,
        }
    }

    /// # Errors
    ///
    /// Returns `PracticeError::TimerStopped` once the timer has finished.
    pub fn start(&self) -> Result<(), PracticeError> {
        self.send(TimerAction::Start)
    }

    /// # Errors
    ///
    /// Returns `PracticeError::TimerStopped` once the timer has finished.
    pub fn advance(&self) -> Result<(), PracticeError> {
        self.send(TimerAction::Advance)
    }

    /// # Errors
    ///
    /// Returns `PracticeError::TimerStopped` once the timer has finished.
    pub fn see_solution(&self) -> Result<(), PracticeError> {
        self.send(TimerAction::SeeSolution)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshots.borrow()
    }

    /// Receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    /// Wait for the timer to reach `Finished` and return the attempt timings.
    ///
    /// Returns `None` if the timer task ended without finishing.
    pub async fn finished(mut self) -> Option<CompletedAttempt> {
        (&mut self.completed).await.ok()
    }

    fn send(&self, action: TimerAction) -> Result<(), PracticeError> {
        self.actions
            .send(action)
            .map_err(|_| PracticeError::TimerStopped)
    }
}

impl Drop for AttemptTimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_timer(
    mut actions: mpsc::UnboundedReceiver<TimerAction>,
    snapshots: watch::Sender<TimerSnapshot>,
    completed: oneshot::Sender<CompletedAttempt>,
) {
    let mut snapshot = TimerSnapshot::idle();
    let mut ticker: Option<Interval> = None;

    loop {
        let action = tokio::select! {
            received = actions.recv() => match received {
                Some(action) => action,
                None => {
                    tracing::debug!(phase = %snapshot.phase(), "attempt discarded");
                    return;
                }
            },
            () = next_tick(&mut ticker) => TimerAction::Tick,
        };

        let transition = match snapshot.apply(action) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring timer action");
                continue;
            }
        };

        let next = transition.snapshot;
        if next.phase() != snapshot.phase() {
            tracing::debug!(from = %snapshot.phase(), to = %next.phase(), "timer phase changed");
            // A fresh interval per phase; ticks of the old phase are dropped with it.
            ticker = next.phase().is_active().then(phase_ticker);
        }
        snapshot = next;
        snapshots.send_replace(snapshot);

        if let Some(attempt) = transition.completed {
            if completed.send(attempt).is_err() {
                tracing::debug!("finished attempt had no receiver");
            }
            return;
        }
    }
}

fn phase_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::sleep;
    use tracker_core::timer::{PHASE_BUDGET_SECS, TimerPhase};

    async fn wait_for_phase(rx: &mut watch::Receiver<TimerSnapshot>, phase: TimerPhase) {
        rx.wait_for(|s| s.phase() == phase).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn thinking_runs_out_into_coding() {
        let handle = AttemptTimerHandle::spawn();
        handle.start().unwrap();

        sleep(Duration::from_millis(600_500)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase(), TimerPhase::Coding);
        assert_eq!(snapshot.seconds_remaining(), PHASE_BUDGET_SECS);
        assert_eq!(snapshot.elapsed_think(), PHASE_BUDGET_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn see_solution_while_coding_reports_elapsed_time() {
        let handle = AttemptTimerHandle::spawn();
        let mut updates = handle.subscribe();
        handle.start().unwrap();

        sleep(Duration::from_millis(30_500)).await;
        handle.advance().unwrap();
        wait_for_phase(&mut updates, TimerPhase::Coding).await;

        sleep(Duration::from_millis(60_200)).await;
        assert_eq!(handle.snapshot().seconds_remaining(), 540);

        handle.see_solution().unwrap();
        wait_for_phase(&mut updates, TimerPhase::Reviewing).await;
        handle.advance().unwrap();

        let attempt = handle.finished().await.unwrap();
        assert_eq!(
            attempt,
            CompletedAttempt {
                time_think: 30,
                time_code: 60,
                saw_solution: true,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_actions_are_ignored() {
        let handle = AttemptTimerHandle::spawn();
        let mut updates = handle.subscribe();

        handle.advance().unwrap();
        handle.see_solution().unwrap();
        handle.start().unwrap();
        wait_for_phase(&mut updates, TimerPhase::Thinking).await;

        assert_eq!(handle.snapshot().seconds_remaining(), PHASE_BUDGET_SECS);
        assert!(!handle.snapshot().saw_solution());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_discards_the_attempt() {
        let handle = AttemptTimerHandle::spawn();
        let mut updates = handle.subscribe();
        handle.start().unwrap();
        wait_for_phase(&mut updates, TimerPhase::Thinking).await;

        drop(handle);

        while updates.changed().await.is_ok() {}
        assert_eq!(updates.borrow().phase(), TimerPhase::Thinking);
    }

    #[tokio::test(start_paused = true)]
    async fn actions_after_finish_report_stopped_timer() {
        let handle = AttemptTimerHandle::spawn();
        let mut updates = handle.subscribe();
        handle.start().unwrap();
        handle.advance().unwrap();
        handle.advance().unwrap();
        wait_for_phase(&mut updates, TimerPhase::Finished).await;

        while updates.changed().await.is_ok() {}
        assert!(matches!(handle.advance(), Err(PracticeError::TimerStopped)));
    }
}
