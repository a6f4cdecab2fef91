use thiserror::Error;

/// Every way a contact submission can fail.
///
/// `Validation` and `CreationFailed` display the bare message so that backend
/// debug text reaches the user unchanged.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    CreationFailed(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ContactError {
    pub fn kind(&self) -> &'static str {
        match self {
            ContactError::Validation(_) => "ValidationError",
            ContactError::Authentication(_) => "AuthenticationError",
            ContactError::CreationFailed(_) => "CreationFailed",
            ContactError::Transport(_) => "TransportError",
            ContactError::Config(_) => "ConfigError",
        }
    }
}

impl From<reqwest::Error> for ContactError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ContactError::Transport(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            ContactError::Transport(format!("Connection failed: {}", e))
        } else {
            ContactError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ContactError {
    fn from(e: serde_json::Error) -> Self {
        ContactError::Transport(format!("Malformed response: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
