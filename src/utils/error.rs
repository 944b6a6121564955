use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No credential '{key}' found in {path}")]
    MissingCredentialError { key: String, path: String },

    #[error("Probe processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類（用於日誌與退出碼）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Credential,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProbeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::HttpError(_) => ErrorCategory::Network,
            ProbeError::IoError(_) => ErrorCategory::System,
            ProbeError::SerializationError(_) => ErrorCategory::Data,
            ProbeError::ConfigError { .. }
            | ProbeError::ConfigValidationError { .. }
            | ProbeError::InvalidConfigValueError { .. }
            | ProbeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ProbeError::MissingCredentialError { .. } => ErrorCategory::Credential,
            ProbeError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            ProbeError::HttpError(_) => ErrorSeverity::Medium,
            ProbeError::IoError(_) => ErrorSeverity::Critical,
            ProbeError::SerializationError(_) => ErrorSeverity::High,
            ProbeError::ConfigError { .. }
            | ProbeError::ConfigValidationError { .. }
            | ProbeError::InvalidConfigValueError { .. }
            | ProbeError::MissingConfigError { .. } => ErrorSeverity::High,
            // 沒有憑證就無法執行 dashboard 探測
            ProbeError::MissingCredentialError { .. } => ErrorSeverity::Critical,
            ProbeError::ProcessingError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ProbeError::HttpError(_) => {
                "Check network connectivity and whether the endpoint is reachable, then retry"
                    .to_string()
            }
            ProbeError::IoError(_) => {
                "Check file permissions and that the output path exists".to_string()
            }
            ProbeError::SerializationError(_) => {
                "The endpoint returned something that is not the expected JSON; inspect it manually"
                    .to_string()
            }
            ProbeError::ConfigError { .. }
            | ProbeError::ConfigValidationError { .. }
            | ProbeError::InvalidConfigValueError { .. } => {
                "Fix the recon config file or the CLI flags and run again".to_string()
            }
            ProbeError::MissingConfigError { field } => {
                format!("Add the missing '{}' setting to the recon config", field)
            }
            ProbeError::MissingCredentialError { key, path } => {
                format!("Add a '{}=...' line to {} and run again", key, path)
            }
            ProbeError::ProcessingError { .. } => {
                "The remote page or API changed shape; re-check the probe definition".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProbeError::HttpError(e) => format!("Request failed: {}", e),
            ProbeError::IoError(e) => format!("File operation failed: {}", e),
            ProbeError::SerializationError(_) => "Response was not valid JSON".to_string(),
            ProbeError::MissingCredentialError { key, path } => {
                format!("no key: '{}' not found in {}", key, path)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
