use crate::config::LogFormat;
use crate::utils::error::{PbmError, Result};
use crate::utils::validation::{validate_endpoint_url, validate_non_empty_string, validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk configuration. Every key is optional; command-line flags fill in
/// or override whatever the file leaves out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub compliance: ComplianceSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionSection {
    pub endpoint: Option<String>,
    pub session_cookie: Option<String>,
    pub api_version: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub insecure: Option<bool>,
    pub user_agent: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrySection {
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceSection {
    pub poll_interval_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<LogFormat>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PbmError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PbmError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as written so validation reports them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PbmError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.connection.endpoint {
            validate_endpoint_url("connection.endpoint", endpoint)?;
        }
        if let Some(version) = &self.connection.api_version {
            validate_non_empty_string("connection.api_version", version)?;
        }
        if let Some(cookie) = &self.connection.session_cookie {
            if cookie.contains("${") {
                return Err(PbmError::InvalidConfigValueError {
                    field: "connection.session_cookie".to_string(),
                    value: cookie.clone(),
                    reason: "environment variable is not set".to_string(),
                });
            }
        }
        if let Some(timeout) = self.connection.timeout_seconds {
            validate_positive_number("connection.timeout_seconds", timeout, 1)?;
        }
        if let Some(attempts) = self.retry.attempts {
            validate_range("retry.attempts", attempts, 0, 10)?;
        }
        if let Some(poll) = self.compliance.poll_interval_ms {
            validate_positive_number("compliance.poll_interval_ms", poll, 1)?;
        }
        Ok(())
    }
}
