//! Progress and message reporting, injected into the pipeline.
//!
//! Reporting is purely observational: nothing a reporter does can change
//! which pages are fetched or written.

use std::fmt;

/// Category of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Sink for run messages and per-page progress.
pub trait Reporter: Send + Sync {
    /// Emit one categorized message.
    fn report(&self, level: Level, message: &str);

    /// Start a progress task of `total` steps.
    fn task(&self, label: &str, total: usize) -> Box<dyn TaskProgress>;
}

/// Handle on a running progress task.
pub trait TaskProgress: Send {
    /// One step done.
    fn advance(&self);
    /// Task over (completed or interrupted).
    fn finish(&self);
}

/// Reporter that drops everything, for headless and test usage.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _level: Level, _message: &str) {}

    fn task(&self, _label: &str, _total: usize) -> Box<dyn TaskProgress> {
        Box::new(SilentTask)
    }
}

struct SilentTask;

impl TaskProgress for SilentTask {
    fn advance(&self) {}
    fn finish(&self) {}
}
