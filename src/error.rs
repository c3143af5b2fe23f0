use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Script file not found: {0}")]
    ScriptNotFound(String),

    #[error("Failed to read script file: {0}")]
    ScriptReadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Terminal too small (minimum {min_width}x{min_height})")]
    TerminalTooSmall { min_width: u16, min_height: u16 },

    #[error("Fullscreen unavailable: {0}")]
    FullscreenUnavailable(String),

    #[error("Config directory creation failed: {0}")]
    ConfigDirError(String),

    #[error("Failed to initialize logging: {0}")]
    LoggingError(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
