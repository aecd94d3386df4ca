mod attempt;
mod ids;
mod playlist;
mod question;
mod state;

pub use ids::{IdError, PlaylistName, QuestionUrl};

pub use attempt::{Attempt, AttemptError, CompletedAttempt};
pub use playlist::{Playlist, PlaylistError, SpeedrunRun};
pub use question::{CompletionStatus, Difficulty, Question, QuestionError};
pub use state::TrackerState;
