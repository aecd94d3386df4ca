//! Practice sessions: choosing questions, timing attempts, saving results.

mod driver;
mod service;

pub use driver::AttemptTimerHandle;
pub use service::{PracticeService, PracticeStep, RecordedAttempt};
