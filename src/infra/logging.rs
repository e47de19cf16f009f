//! Logging bootstrap for the CLI.
//!
//! Library code logs through the `log` facade only; the binary wires the
//! facade to stderr here. Initialization failure is never fatal — a notes
//! tool without diagnostics still has to work.

use flexi_logger::{Logger, LoggerHandle};

/// Maps a `-v` count to a log level specification.
///
/// - default: warn
/// - `-v`: info
/// - `-vv`: debug
/// - `-vvv` and up: trace
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes stderr logging for the given verbosity.
///
/// The `RUST_LOG` environment variable overrides the flag-derived level.
/// Returns the handle keeping the logger alive, or `None` if initialization
/// failed (in which case log output is simply dropped).
pub fn init(verbosity: u8) -> Option<LoggerHandle> {
    Logger::try_with_env_or_str(level_for(verbosity))
        .ok()?
        .log_to_stderr()
        .start()
        .ok()
}
