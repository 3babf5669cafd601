use clap::Parser;
use pbm_client::app::run_command;
use pbm_client::utils::error::{ErrorSeverity, PbmError};
use pbm_client::utils::{logger, validation::Validate};
use pbm_client::{CliConfig, HttpTransport, PbmClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(settings.log_format, settings.verbose);

    tracing::info!("Starting pbm CLI");
    if settings.verbose {
        tracing::debug!("Resolved settings: {}", serde_json::to_string(&settings)?);
    }

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let transport = match HttpTransport::new(&settings) {
        Ok(transport) => transport,
        Err(e) => exit_with(e),
    };
    let client = PbmClient::new(transport);

    match run_command(&client, &settings, &cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: PbmError) -> ! {
    tracing::error!(
        "❌ PBM command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    if let Some(fault) = e.remote_fault() {
        tracing::error!("Fault detail: {:?}", fault.detail);
    }
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
