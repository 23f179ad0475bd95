#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod exercise_search;
pub mod log;
mod service;
mod settings;
pub mod sync;

pub use exercise_search::ExerciseSearch;
pub use service::Service;
pub use settings::{LogLevel, Settings, SettingsRepository, SettingsService};
