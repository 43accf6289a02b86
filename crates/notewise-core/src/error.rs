use thiserror::Error;

/// Top-level error type for the Notewise system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for NotewiseError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotewiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NotewiseError {
    fn from(err: toml::de::Error) -> Self {
        NotewiseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NotewiseError {
    fn from(err: toml::ser::Error) -> Self {
        NotewiseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NotewiseError {
    fn from(err: serde_json::Error) -> Self {
        NotewiseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Notewise operations.
pub type Result<T> = std::result::Result<T, NotewiseError>;
