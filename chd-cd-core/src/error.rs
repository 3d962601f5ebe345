use thiserror::Error;

/// Boxed error raised by a hunk store implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while reading the CD-ROM layer of a CHD image.
#[derive(Debug, Error)]
pub enum CdError {
    /// Malformed metadata text, unknown token, bad track number or ordering
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Legacy on-disc format, or a sector conversion with no defined rule
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// No CD-ROM / GD-ROM metadata in the image
    #[error("Not found: {0}")]
    NotFound(String),

    /// Track or sector number outside the disc
    #[error("Out of range: {0}")]
    Range(String),

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by the hunk store (decompression, container errors)
    #[error("Hunk store error: {0}")]
    Store(#[source] StoreError),
}

impl CdError {
    pub fn parsing(msg: impl Into<String>) -> Self {
        Self::Parsing(msg.into())
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Wrap an error coming out of a hunk store, keeping it as the source.
    pub fn store(err: impl Into<StoreError>) -> Self {
        Self::Store(err.into())
    }
}

/// Result alias used throughout the CD layer.
pub type CdResult<T> = Result<T, CdError>;
