use crate::core::operations::Operation;
use crate::domain::ports::{ConfigProvider, Transport};
use crate::soap::envelope::is_soap_envelope;
use crate::utils::error::{PbmError, Result};
use crate::utils::validation::validate_endpoint_url;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

pub const SESSION_COOKIE_HEADER: &str = "vcSessionCookie";
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Exponential backoff for transient transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self {
            attempts: config.retry_attempts(),
            base_delay: Duration::from_millis(config.retry_delay_ms()),
            max_delay: Duration::from_millis(config.retry_max_delay_ms()),
        }
    }

    pub fn none() -> Self {
        Self {
            attempts: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based): base, 2x, 4x, ...
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Connect failures and 503 mean the server never ran the call, so any
/// operation may be resent. Timeouts, broken reads, 502 and 504 may follow a
/// committed call and are only retried for idempotent operations. SOAP faults
/// arrive as successful round trips and never reach this check.
pub fn is_retryable(error: &PbmError, idempotent: bool) -> bool {
    match error {
        PbmError::Http(e) if e.is_connect() => true,
        PbmError::Http(e) => idempotent && (e.is_timeout() || e.is_body() || e.is_decode()),
        PbmError::HttpStatus { status: 503, .. } => true,
        PbmError::HttpStatus { status, .. } => idempotent && matches!(status, 502 | 504),
        _ => false,
    }
}

/// SOAP over HTTP(S) to a vCenter PBM endpoint (`https://<vc>/pbm/sdk`).
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    soap_action: String,
    session_cookie: Option<String>,
    headers: Vec<(String, String)>,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(config: &impl ConfigProvider) -> Result<Self> {
        let endpoint = validate_endpoint_url("connection.endpoint", config.endpoint())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .user_agent(config.user_agent())
            .build()?;

        if config.accept_invalid_certs() {
            tracing::warn!("TLS certificate verification is disabled for {}", endpoint);
        }

        Ok(Self {
            client,
            endpoint,
            soap_action: format!("urn:pbm/{}", config.api_version()),
            session_cookie: config.session_cookie().map(str::to_string),
            headers: config.extra_headers().to_vec(),
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send_once(&self, operation: &str, envelope: &str) -> Result<String> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", &self.soap_action);

        if let Some(cookie) = &self.session_cookie {
            request = request.header(SESSION_COOKIE_HEADER, cookie);
        }
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        tracing::debug!("POST {} ({})", self.endpoint, operation);
        let response = request.body(envelope.to_string()).send().await?;
        let status = response.status();
        tracing::debug!("PBM response status: {}", status);

        let body = response.text().await?;
        // Faults come back as 500 with a SOAP body; a proxy error page does not.
        let soap_fault = status == StatusCode::INTERNAL_SERVER_ERROR && is_soap_envelope(&body);
        if status.is_success() || soap_fault {
            Ok(body)
        } else {
            Err(PbmError::HttpStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, operation: &str, envelope: String) -> Result<String> {
        let idempotent = Operation::from_name(operation).is_some_and(|op| op.is_idempotent());
        let mut attempt = 0;
        loop {
            match self.send_once(operation, &envelope).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.retry.attempts && is_retryable(&err, idempotent) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying PBM request after error: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
