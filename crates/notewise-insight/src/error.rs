use notewise_core::NotewiseError;
use thiserror::Error;

/// Errors that can occur in the summarization pipeline.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        InsightError::Serialization(err.to_string())
    }
}

impl From<InsightError> for NotewiseError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::InvalidArgument(msg) => NotewiseError::InvalidArgument(msg),
            InsightError::Serialization(msg) => NotewiseError::Serialization(msg),
        }
    }
}
