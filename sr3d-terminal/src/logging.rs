//! Logger initialization.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "sr3d_core=debug"). If `file` is set, records go there instead of stderr,
/// which is needed while the terminal shows the rendered frames.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub file: Option<PathBuf>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Fails only if the log file cannot be
/// created.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    if INIT.is_completed() {
        return Ok(());
    }
    let target = match &config.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            env_logger::Target::Pipe(Box::new(file))
        }
        None => env_logger::Target::Stderr,
    };

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }
        builder.target(target);

        // Another logger may already be installed, e.g. by a test harness
        let _ = builder.try_init();

        log::debug!("logging initialized");
    });
    Ok(())
}
