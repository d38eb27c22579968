pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::HttpPredictionSource, terminal::TerminalView};
pub use config::Settings;
pub use crate::core::{handler::SubmissionHandler, session::Session};
pub use utils::error::{NationalizeError, Result};
