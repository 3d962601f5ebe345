use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure opening or reading the disc image
    #[error(transparent)]
    Cd(#[from] chd_cd::CdError),

    /// JSON export failed
    #[error("JSON export failed")]
    Json(#[from] serde_json::Error),

    /// Bad command-line input
    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl CliError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }
}
