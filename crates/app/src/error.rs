//! Front end error type

/// Front end result type
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] rapat_core::Error),

    #[error(transparent)]
    Calendar(#[from] rapat_net::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine the {0} directory")]
    NoProjectDirs(&'static str),
}

impl AppError {
    /// Whether the error is a recoverable user mistake rather than a fault
    pub fn is_user_warning(&self) -> bool {
        match self {
            AppError::Core(e) => e.is_user_warning(),
            AppError::Calendar(
                rapat_net::Error::NotConfigured(_) | rapat_net::Error::InvalidEvent(_),
            ) => true,
            _ => false,
        }
    }
}
