use crate::config::{ConnectionSettings, LogFormat, TomlConfig};
use crate::utils::error::Result;
use crate::utils::validation::{parse_key_value, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pbm")]
#[command(about = "Query and manage vSphere storage policies over the PBM API")]
pub struct CliConfig {
    /// TOML file with [connection], [retry], [compliance] and [logging] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// PBM SDK URL, e.g. https://vc.example.com/pbm/sdk
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// vCenter session cookie sent as the vcSessionCookie header
    #[arg(long, global = true)]
    pub session_cookie: Option<String>,

    #[arg(long, global = true)]
    pub api_version: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Accept self-signed vCenter certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Extra request header, KEY=VALUE (repeatable)
    #[arg(long = "header", global = true)]
    pub headers: Vec<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the PBM service's about info
    About,
    /// List storage profile ids
    Profiles {
        /// REQUIREMENT, RESOURCE or DATA_SERVICE_POLICY
        #[arg(long)]
        category: Option<String>,
    },
    /// Fetch full profile definitions
    ProfileContent {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Create a requirement profile from capability rules
    CreateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Capability rule NAMESPACE.ID=VALUE (repeatable)
        #[arg(long = "capability", required = true)]
        capabilities: Vec<String>,
    },
    DeleteProfile {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Run a compliance check for virtual machines
    CheckCompliance {
        #[arg(long = "vm", required = true)]
        vms: Vec<String>,
        #[arg(long)]
        profile: Option<String>,
        /// Poll until no result is still in progress
        #[arg(long)]
        wait: bool,
    },
    RollupCompliance {
        #[arg(long = "vm", required = true)]
        vms: Vec<String>,
    },
    /// Datastores that satisfy a profile
    MatchingHubs {
        #[arg(long)]
        profile: String,
        /// Restrict the search to these datastores
        #[arg(long = "datastore")]
        datastores: Vec<String>,
    },
    CapabilityMetadata {
        #[arg(long)]
        vendor_uuid: Option<String>,
    },
    VendorInfo,
    ReplicationGroups {
        #[arg(long = "vm", required = true)]
        vms: Vec<String>,
    },
    AssociatedProfiles {
        #[arg(long = "vm", required = true)]
        vms: Vec<String>,
    },
    /// List every PBM operation this client speaks
    Operations,
}

impl CliConfig {
    /// Loads the config file, if any, then applies flags on top.
    pub fn resolve(&self) -> Result<ConnectionSettings> {
        let mut settings = ConnectionSettings::default();
        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings = settings.merge_file(&file);
        }

        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(cookie) = &self.session_cookie {
            settings.session_cookie = Some(cookie.clone());
        }
        if let Some(version) = &self.api_version {
            settings.api_version = version.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if self.insecure {
            settings.accept_invalid_certs = true;
        }
        for raw in &self.headers {
            settings.extra_headers.push(parse_key_value("header", raw)?);
        }
        if self.verbose {
            settings.verbose = true;
        }
        if let Some(format) = self.log_format {
            settings.log_format = format;
        }
        Ok(settings)
    }
}
