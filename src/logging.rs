//! Logging bootstrap
//!
//! Initializes the process-wide logger exactly once; repeated calls are
//! idempotent. The library itself only emits through the `log` facade.

use flexi_logger::{Logger, LoggerHandle};
use std::sync::OnceLock;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Default log level for the current build mode
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

/// Initialize stderr logging at the given level
///
/// Initialization never panics; failures come back as a human-readable
/// string so the caller can decide whether to proceed without logs.
pub fn init_logging(level: &str) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    // A racing second init loses; its handle is dropped, which is harmless.
    let _ = LOGGER.set(handle);
    Ok(())
}
