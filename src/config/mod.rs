#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PbmError, Result};
use crate::utils::validation::{
    validate_endpoint_url, validate_non_empty_string, validate_positive_number, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "8.0";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 10_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_COMPLIANCE_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Fully resolved settings: defaults, then the config file, then flags.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    pub endpoint: String,
    pub api_version: String,
    #[serde(skip_serializing)]
    pub session_cookie: Option<String>,
    pub timeout_seconds: u64,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub extra_headers: Vec<(String, String)>,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub compliance_poll_interval_ms: u64,
    pub compliance_timeout_seconds: u64,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            session_cookie: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            accept_invalid_certs: false,
            user_agent: concat!("pbm-client/", env!("CARGO_PKG_VERSION")).to_string(),
            extra_headers: Vec::new(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            retry_max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            compliance_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            compliance_timeout_seconds: DEFAULT_COMPLIANCE_TIMEOUT_SECONDS,
            log_format: LogFormat::Text,
            verbose: false,
        }
    }
}

impl ConnectionSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Layers the values present in `file` over the current settings.
    pub fn merge_file(mut self, file: &TomlConfig) -> Self {
        let connection = &file.connection;
        if let Some(endpoint) = &connection.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(version) = &connection.api_version {
            self.api_version = version.clone();
        }
        if connection.session_cookie.is_some() {
            self.session_cookie = connection.session_cookie.clone();
        }
        if let Some(timeout) = connection.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(insecure) = connection.insecure {
            self.accept_invalid_certs = insecure;
        }
        if let Some(user_agent) = &connection.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(headers) = &connection.headers {
            self.extra_headers
                .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if let Some(attempts) = file.retry.attempts {
            self.retry_attempts = attempts;
        }
        if let Some(delay) = file.retry.delay_ms {
            self.retry_delay_ms = delay;
        }
        if let Some(max_delay) = file.retry.max_delay_ms {
            self.retry_max_delay_ms = max_delay;
        }

        if let Some(poll) = file.compliance.poll_interval_ms {
            self.compliance_poll_interval_ms = poll;
        }
        if let Some(timeout) = file.compliance.timeout_seconds {
            self.compliance_timeout_seconds = timeout;
        }

        if let Some(format) = file.logging.format {
            self.log_format = format;
        }
        if let Some(verbose) = file.logging.verbose {
            self.verbose = verbose;
        }
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay_ms = delay_ms;
        self
    }

    pub fn compliance_poll_interval(&self) -> Duration {
        Duration::from_millis(self.compliance_poll_interval_ms)
    }

    pub fn compliance_timeout(&self) -> Duration {
        Duration::from_secs(self.compliance_timeout_seconds)
    }
}

impl ConfigProvider for ConnectionSettings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms
    }

    fn retry_max_delay_ms(&self) -> u64 {
        self.retry_max_delay_ms
    }
}

impl Validate for ConnectionSettings {
    fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(PbmError::MissingConfigError {
                field: "endpoint".to_string(),
            });
        }
        validate_endpoint_url("endpoint", &self.endpoint)?;
        validate_non_empty_string("api_version", &self.api_version)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("retry_attempts", self.retry_attempts, 0, 10)?;
        validate_positive_number("compliance_poll_interval_ms", self.compliance_poll_interval_ms, 1)?;
        validate_positive_number("compliance_timeout_seconds", self.compliance_timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_defaults() {
        let settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk");
        assert_eq!(settings.api_version(), "8.0");
        assert_eq!(settings.retry_attempts(), 3);
        assert_eq!(settings.compliance_poll_interval(), Duration::from_secs(2));
        assert!(settings.session_cookie().is_none());
        assert!(settings.user_agent().starts_with("pbm-client/"));
        assert_ok!(settings.validate());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = TomlConfig::from_toml_str(
            r#"
[connection]
endpoint = "https://vc.example.com/pbm/sdk"
api_version = "7.0.3"
insecure = true
headers = { "X-Trace" = "abc" }

[retry]
attempts = 0

[logging]
format = "json"
"#,
        )
        .unwrap();

        let settings = ConnectionSettings::default().merge_file(&file);
        assert_eq!(settings.endpoint, "https://vc.example.com/pbm/sdk");
        assert_eq!(settings.api_version, "7.0.3");
        assert!(settings.accept_invalid_certs);
        assert_eq!(settings.extra_headers, vec![("X-Trace".to_string(), "abc".to_string())]);
        assert_eq!(settings.retry_attempts, 0);
        assert_eq!(settings.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        assert!(matches!(
            ConnectionSettings::default().validate(),
            Err(PbmError::MissingConfigError { .. })
        ));

        let mut settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk");
        settings.timeout_seconds = 0;
        assert_err!(settings.validate());

        let mut settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk");
        settings.api_version = " ".to_string();
        assert_err!(settings.validate());

        let settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk").with_retry(11, 100);
        assert_err!(settings.validate());
    }

    #[test]
    fn test_session_cookie_is_not_serialized() {
        let settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk").with_session_cookie("secret");
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
    }
}
