//! Output formatting utilities
//!
//! Formatters for human-readable and JSON output, plus the progress
//! reporter the transfer engine renders through.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::CliReporter;

/// Output configuration derived from the global CLI flags.
///
/// Threaded through every command instead of living in process-global
/// state, so each invocation is self-contained.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress bars
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Whether progress rendering is suppressed entirely
    pub fn progress_hidden(&self) -> bool {
        self.quiet || self.json || self.no_progress
    }
}
