use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber
///
/// `level_override` (the `--log-level` flag) wins over `RUST_LOG`, which
/// wins over the configured level. Logs go to stderr so reports on stdout
/// stay machine-readable.
pub fn init(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").ok();
    let filter = build_filter(config, level_override, env_filter.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow!("Failed to install logger: {}", e))
}

/// Pick the filter directive: flag, then environment, then config
fn select_directive<'a>(
    config: &'a LoggingConfig,
    level_override: Option<&'a str>,
    env_filter: Option<&'a str>,
) -> &'a str {
    level_override
        .or(env_filter.filter(|directive| !directive.trim().is_empty()))
        .unwrap_or(config.level.as_str())
}

fn build_filter(
    config: &LoggingConfig,
    level_override: Option<&str>,
    env_filter: Option<&str>,
) -> Result<EnvFilter> {
    let directive = select_directive(config, level_override, env_filter);
    EnvFilter::try_new(directive).map_err(|e| anyhow!("Invalid log level '{}': {}", directive, e))
}
