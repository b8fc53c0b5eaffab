//! Tracing setup shared by the binaries.

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging flags accepted by every binary.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Tracing log level or filter directive (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Installs a stderr subscriber. Stdout is reserved for command output.
pub fn init(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
