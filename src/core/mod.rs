pub mod client;
pub mod compliance;
pub mod operations;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::ports::{ConfigProvider, Transport};
pub use crate::utils::error::Result;
pub use client::PbmClient;
pub use compliance::{ComplianceMonitor, ComplianceSummary};
pub use operations::{Effect, Manager, Operation};
