use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. Logs go to stderr so stdout stays machine-readable.
pub fn init(filter: &str) -> Result<()> {
    let env_filter = build_filter(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

pub fn build_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("invalid log filter: {filter}"))
}
