#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod locate;
pub mod platform;
pub mod schedule;
pub mod service;

pub use cli::commands::{Cli, Commands};
pub use config::Config;
pub use error::SyncError;
