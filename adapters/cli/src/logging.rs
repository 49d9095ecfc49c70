use std::path::Path;

use anyhow::{Context, Result};
use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

const LOG_BASENAME: &str = "tile-merge";
const ROTATE_AFTER_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 3;

/// Starts the global logger.
///
/// `RUST_LOG` takes precedence over `spec`. Without a directory, records go to
/// stderr so they stay out of the board drawn on stdout. The returned handle
/// must be kept alive for file output to be flushed.
pub(crate) fn init(spec: &str, directory: Option<&Path>) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(spec)
        .with_context(|| format!("invalid log specification '{spec}'"))?;

    let logger = match directory {
        Some(directory) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(directory)
                    .basename(LOG_BASENAME),
            )
            .format(opt_format)
            .rotate(
                Criterion::Size(ROTATE_AFTER_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEPT_LOG_FILES),
            ),
        None => logger.format(flexi_logger::colored_default_format),
    };

    logger.start().context("failed to start logger")
}
