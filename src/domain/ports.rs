use crate::utils::error::Result;
use async_trait::async_trait;

/// Carries one SOAP envelope to the PBM endpoint and returns the response
/// document. HTTP 500 bodies are returned as-is so SOAP faults can be decoded.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, operation: &str, envelope: String) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn round_trip(&self, operation: &str, envelope: String) -> Result<String> {
        (**self).round_trip(operation, envelope).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn api_version(&self) -> &str;
    fn session_cookie(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn accept_invalid_certs(&self) -> bool;
    fn user_agent(&self) -> &str;
    fn extra_headers(&self) -> &[(String, String)];
    fn retry_attempts(&self) -> u32;
    fn retry_delay_ms(&self) -> u64;
    fn retry_max_delay_ms(&self) -> u64;
}
