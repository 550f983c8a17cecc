use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnblockError {
    #[error("Server responded with HTTP status {status}")]
    Transport { status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned an error: {message}")]
    ApiError { message: String },

    #[error("Session id not from the US (got {country_code})")]
    WrongRegion { country_code: String },

    #[error("All {attempts} servers failed to provide a session id")]
    AllServersExhausted {
        attempts: usize,
        last: Option<Box<UnblockError>>,
    },

    #[error("Password decryption failed: {message}")]
    DecryptError { message: String },

    #[error("Login failed: {message}")]
    LoginError { message: String },

    #[error("Preference storage error: {message}")]
    StorageError { message: String },

    #[error("Cookie could not be set: {message}")]
    CookieError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid trigger message: {reason}")]
    InvalidTrigger { reason: String },
}

impl UnblockError {
    /// 單一候選伺服器的失敗，切換到下一台即可
    pub fn is_candidate_failure(&self) -> bool {
        matches!(
            self,
            UnblockError::Transport { .. }
                | UnblockError::Http(_)
                | UnblockError::ApiError { .. }
                | UnblockError::WrongRegion { .. }
                | UnblockError::SerializationError(_)
        )
    }

    /// 顯示給使用者的訊息（通知內容）
    pub fn user_friendly_message(&self) -> String {
        match self {
            UnblockError::AllServersExhausted { .. } => {
                "Main server and backup server couldn't get a session id".to_string()
            }
            UnblockError::DecryptError { .. } | UnblockError::LoginError { .. } => {
                "Failed to login, please log in manually.".to_string()
            }
            UnblockError::CookieError { .. } => {
                "Couldn't set the session cookies, please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UnblockError>;
