//! The [`Log`] trait shared by the linker and the commands.
use std::path::Path;

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests substitute
/// an in-memory recorder so the linker can be exercised without a global
/// subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a change that would be made outside of dry-run mode.
    fn dry_run(&self, msg: &str);
    /// Path of the persistent log file, if one is being written.
    fn log_file(&self) -> Option<&Path> {
        None
    }
}
