use crate::config::ConfigError;
use crate::file_organizer::OrganizeError;
use thiserror::Error;

/// Errors that stop a run before or while organizing.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Desktop directory not found")]
    DesktopNotFound,

    #[error("Failed to read answer: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("{0}")]
    Organize(#[from] OrganizeError),

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
