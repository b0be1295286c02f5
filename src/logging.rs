//! Logger setup for the binary.

use flexi_logger::{Logger, LoggerHandle, opt_format};

/// Start logging to stderr.
///
/// `RUST_LOG` wins over `level` when set. Stdout is left alone so the GTP
/// frontend can own it. Keep the returned handle alive for the program's
/// lifetime.
pub fn setup_logging(level: &str) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .format(opt_format)
        .start()?;
    Ok(handle)
}
