//! Logging system initialization
//!
//! Console logging through `tracing-subscriber` with an `EnvFilter` built
//! from [`LoggingConfig`]. The `RUST_LOG` environment variable, when set,
//! takes precedence over the configured levels.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

pub use crate::infrastructure::config::LoggingConfig;

/// Build the filter directive string from configuration
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.clone()];
    let mut modules: Vec<_> = config.module_filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        directives.push(format!("{module}={level}"));
    }
    directives.join(",")
}

/// Initialize the logging system
///
/// Safe to call once at process start; a second call returns an error from
/// the global subscriber registration.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}
