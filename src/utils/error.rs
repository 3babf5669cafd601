use crate::fault::RemoteFault;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PbmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML error: {message}")]
    Xml { message: String },

    #[error("Response decoding error: {message}")]
    Decode { message: String },

    #[error("PBM endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("{0}")]
    Remote(RemoteFault),

    #[error("Timed out: {message}")]
    Timeout { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Protocol,
    Remote,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PbmError {
    pub fn xml(message: impl Into<String>) -> Self {
        PbmError::Xml {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        PbmError::Decode {
            message: message.into(),
        }
    }

    /// The remote fault carried by this error, if the server raised one.
    pub fn remote_fault(&self) -> Option<&RemoteFault> {
        match self {
            PbmError::Remote(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PbmError::Http(_) | PbmError::Timeout { .. } => ErrorCategory::Network,
            PbmError::HttpStatus { .. }
            | PbmError::Xml { .. }
            | PbmError::Decode { .. }
            | PbmError::Serialization(_) => ErrorCategory::Protocol,
            PbmError::Remote(_) => ErrorCategory::Remote,
            PbmError::ConfigError { .. }
            | PbmError::ConfigValidationError { .. }
            | PbmError::InvalidConfigValueError { .. }
            | PbmError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PbmError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PbmError::Http(_) | PbmError::Timeout { .. } => ErrorSeverity::Medium,
            PbmError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            PbmError::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PbmError::Http(_) => {
                "Check that the vCenter host is reachable and the endpoint URL is correct".to_string()
            }
            PbmError::Timeout { .. } => {
                "Increase the timeout or retry once the server is less busy".to_string()
            }
            PbmError::HttpStatus { status, .. } if *status == 401 || *status == 403 => {
                "Refresh the vCenter session cookie and try again".to_string()
            }
            PbmError::HttpStatus { status, .. } if *status >= 500 => {
                "The PBM service or a proxy in front of it failed; check vCenter health and retry".to_string()
            }
            PbmError::HttpStatus { .. } => {
                "Verify that the endpoint points at the PBM service (/pbm/sdk)".to_string()
            }
            PbmError::Xml { .. } | PbmError::Decode { .. } => {
                "The server response did not match the expected PBM schema; check the API version".to_string()
            }
            PbmError::Remote(fault) if fault.kind.is_authentication() => {
                "Log in to vCenter again and pass the new session cookie".to_string()
            }
            PbmError::Remote(_) => {
                "Inspect the fault detail returned by the PBM service".to_string()
            }
            PbmError::ConfigError { .. }
            | PbmError::ConfigValidationError { .. }
            | PbmError::InvalidConfigValueError { .. }
            | PbmError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
            PbmError::Io(_) => "Check file paths and permissions".to_string(),
            PbmError::Serialization(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PbmError::Remote(fault) => format!(
                "The PBM service rejected the request ({}): {}",
                fault.kind.name(),
                fault.message()
            ),
            PbmError::Http(_) => "Could not reach the PBM service".to_string(),
            PbmError::Timeout { message } => format!("Operation timed out: {}", message),
            other => other.to_string(),
        }
    }
}

impl From<RemoteFault> for PbmError {
    fn from(fault: RemoteFault) -> Self {
        PbmError::Remote(fault)
    }
}

pub type Result<T> = std::result::Result<T, PbmError>;
