use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Log level for `-v` counts: warnings by default, then info, debug, trace.
fn level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Starts logging to stderr. `RUST_LOG` takes precedence over the flags.
pub fn init(verbose: u8, quiet: bool) -> Result<LoggerHandle> {
    let spec = level(verbose, quiet);
    Logger::try_with_env_or_str(spec)
        .with_context(|| format!("Invalid log specification '{spec}'"))?
        .log_to_stderr()
        .format_for_stderr(flexi_logger::default_format)
        .start()
        .context("Failed to start logger")
}
