#![forbid(unsafe_code)]

pub mod completion;
pub mod import;
pub mod model;
pub mod selector;
pub mod stats;
pub mod time;
pub mod timer;

pub use time::Clock;
