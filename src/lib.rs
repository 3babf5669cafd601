pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod fault;
pub mod soap;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{HttpTransport, RetryPolicy};
pub use config::{ConnectionSettings, TomlConfig};
pub use crate::core::{ComplianceMonitor, ComplianceSummary, Operation, PbmClient};
pub use fault::{FaultKind, RemoteFault};
pub use utils::error::{PbmError, Result};
