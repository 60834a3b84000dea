use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// 空白の識別子に対する検証エラー
    pub(crate) fn empty_id(what: &str) -> Self {
        Error::InvalidInput(format!("expecting a non-empty {}", what))
    }

    /// HTTPステータスコード（ApiErrorの場合のみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_message() {
        let err = Error::empty_id("taskID");
        assert_eq!(err.to_string(), "Invalid input: expecting a non-empty taskID");
        assert!(err.status().is_none());
    }

    #[test]
    fn test_api_error_status() {
        let err = Error::ApiError {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "API error: 404 - Not Found");
    }
}
