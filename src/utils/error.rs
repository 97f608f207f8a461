use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid backend response: {message}")]
    InvalidResponseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，對應表單層的三種失敗與設定錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Validation,
    Config,
}

impl FormError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkError(_) => ErrorKind::Network,
            // 回應內容不符預期，視同伺服器端錯誤
            Self::HttpError { .. } | Self::InvalidResponseError { .. } | Self::SerializationError(_) => {
                ErrorKind::Http
            }
            Self::ValidationError { .. } => ErrorKind::Validation,
            Self::IoError(_) | Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorKind::Config
            }
        }
    }

    /// HTTP status code when the backend answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            Self::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkError(e) if e.is_timeout() => "The server did not answer in time".to_string(),
            Self::NetworkError(_) => "Could not reach the server".to_string(),
            Self::HttpError { status, body } if body.trim().is_empty() => format!("HTTP error {}", status),
            Self::HttpError { status, body } => format!("{} - {}", status, body.trim()),
            Self::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
