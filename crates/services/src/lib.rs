#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod playlist_service;
pub mod practice;

pub use tracker_core::Clock;

pub use app_services::AppServices;
pub use config::TrackerConfig;
pub use error::{ConfigError, PlaylistServiceError, PracticeError};
pub use playlist_service::PlaylistService;
pub use practice::{AttemptTimerHandle, PracticeService, PracticeStep, RecordedAttempt};
