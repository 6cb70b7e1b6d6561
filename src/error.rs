use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Statistics provider returned HTTP {0}")]
    Status(u16),

    #[error("Could not read provider response: {0}")]
    Decode(String),

    #[error("Provider returned {actual} values, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Choose at least one house type and one quarter")]
    MissingSelection,

    #[error("Show a chart before saving it")]
    NothingToSave,

    #[error("Failed to draw chart: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Status(status.as_u16()),
            None if err.is_decode() => AppError::Decode(err.to_string()),
            None => AppError::Request(err.to_string()),
        }
    }
}
