use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FireadminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load credential from {}: {message}", .path.display())]
    Credential { path: PathBuf, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error payload returned by a Google API.
    ///
    /// Only the service's message is displayed so console output reads the
    /// same way the service phrased it.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FireadminError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FireadminError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, FireadminError>;
