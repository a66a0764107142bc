//! Error types for Rapat Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid participant name: {0:?}")]
    InvalidName(String),

    #[error("Participant already on the roster: {0}")]
    Duplicate(String),

    #[error("The roster is empty, add participants first")]
    EmptyRoster,

    #[error("A draw is already in progress")]
    ReentrantSpin,

    #[error("The roster cannot change while a draw is in progress")]
    DrawInProgress,

    #[error("Invalid meeting note: {0}")]
    InvalidNote(String),

    #[error("Import source unavailable: {0}")]
    ImportSourceUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error is a recoverable user-facing warning rather than a fault
    pub fn is_user_warning(&self) -> bool {
        matches!(
            self,
            Error::InvalidName(_)
                | Error::Duplicate(_)
                | Error::EmptyRoster
                | Error::ReentrantSpin
                | Error::DrawInProgress
                | Error::InvalidNote(_)
                | Error::ImportSourceUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
