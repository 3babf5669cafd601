use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pbm_client=debug,info"
    } else {
        "pbm_client=info"
    }
}

/// Installs the global subscriber on stderr. `RUST_LOG` overrides the
/// verbosity flag. JSON lines suit running under a log collector.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(layer.with_target(false).compact()).init(),
        LogFormat::Json => registry.with(layer.with_target(true).json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_crate_debug() {
        assert_eq!(default_directive(true), "pbm_client=debug,info");
        assert_eq!(default_directive(false), "pbm_client=info");
    }
}
