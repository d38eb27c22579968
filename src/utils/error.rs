use thiserror::Error;

#[derive(Error, Debug)]
pub enum NationalizeError {
    #[error("Name is empty or whitespace-only")]
    EmptyQuery,

    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API responded with status {status}")]
    StatusError { status: u16 },

    #[error("Response body is not valid JSON: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse grouping used to pick the user-facing notice and the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Transport,
    Unexpected,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a failure of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl NationalizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NationalizeError::EmptyQuery => ErrorCategory::Validation,
            NationalizeError::HttpError(_) | NationalizeError::StatusError { .. } => {
                ErrorCategory::Transport
            }
            NationalizeError::DecodeError(_)
            | NationalizeError::MalformedPayload { .. }
            | NationalizeError::IoError(_) => ErrorCategory::Unexpected,
            NationalizeError::ConfigError { .. }
            | NationalizeError::InvalidConfigValueError { .. }
            | NationalizeError::UrlError(_) => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Unexpected => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NationalizeError::EmptyQuery => "Please enter a name.".to_string(),
            NationalizeError::HttpError(_) => "Could not reach the names service.".to_string(),
            NationalizeError::StatusError { status } => {
                format!("The names service answered with HTTP {}.", status)
            }
            NationalizeError::DecodeError(_) | NationalizeError::MalformedPayload { .. } => {
                "The names service returned an unreadable response.".to_string()
            }
            NationalizeError::ConfigError { message } => {
                format!("Configuration problem: {}", message)
            }
            NationalizeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            NationalizeError::UrlError(e) => format!("Invalid service URL: {}", e),
            NationalizeError::IoError(e) => format!("IO failure: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Type a non-empty name and submit again",
            ErrorCategory::Transport => {
                "Check that the service is running and --base-url points at it"
            }
            ErrorCategory::Unexpected => "Run with --verbose and inspect the diagnostic log",
            ErrorCategory::Configuration => "Fix the flag or the TOML value named above",
        }
    }
}

pub type Result<T> = std::result::Result<T, NationalizeError>;
