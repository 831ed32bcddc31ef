use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid scan options: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Scan service rejected request: {reason}")]
    Rejected {
        reason: String,
        detail: Option<String>,
    },

    #[error("Scan service error: {0}")]
    UnknownService(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// Whether a failed scan may be retried at page 1 by the recovery
    /// controller. Validation and parse failures are never retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Rejected { .. } | AppError::UnknownService(_)
        )
    }

    /// Service-provided detail string, when the downstream returned one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<tokio::io::Error> for AppError {
    fn from(err: tokio::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;
