//! Core domain types shared by every laradocs crate.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{LaradocsError, Result};

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// One documented release as listed in the site's version selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Display text of the option, trimmed (e.g. `11.x`, `Master`).
    pub name: String,
    /// Absolute URL of this version's documentation root.
    pub url: Url,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

// ---------------------------------------------------------------------------
// OutputFile
// ---------------------------------------------------------------------------

/// A Markdown file ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Destination path (`<output_dir>/<slug>.md`).
    pub path: PathBuf,
    /// Full file content, provenance header included.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Tagged result of a pipeline operation.
///
/// The orchestration loop matches on the tag: a `Recoverable` failure skips
/// the current page, a `Fatal` one aborts the run.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed, but the run can move on to the next unit of work.
    Recoverable(LaradocsError),
    /// The operation failed and nothing after it can proceed.
    Fatal(LaradocsError),
}

impl<T> Outcome<T> {
    /// Classify a `Result` whose error only affects the current unit of work.
    pub fn recoverable(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Recoverable(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success value, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Apply `f` to the success value, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Recoverable(e) => Outcome::Recoverable(e),
            Self::Fatal(e) => Outcome::Fatal(e),
        }
    }

    /// Chain another operation onto a success value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Recoverable(e) => Outcome::Recoverable(e),
            Self::Fatal(e) => Outcome::Fatal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_classifies_results() {
        let ok: Outcome<u32> = Outcome::recoverable(Ok(3));
        assert!(ok.is_success());

        let soft: Outcome<u32> = Outcome::recoverable(Err(LaradocsError::parse("missing")));
        assert!(matches!(soft, Outcome::Recoverable(_)));

        let hard: Outcome<u32> = Outcome::Fatal(LaradocsError::validation("bad url"));
        assert!(!hard.is_success());
        assert!(matches!(hard.and_then(|n| Outcome::Success(n + 1)), Outcome::Fatal(_)));
    }

    #[test]
    fn outcome_and_then_short_circuits() {
        let soft: Outcome<u32> = Outcome::Recoverable(LaradocsError::parse("missing"));
        let chained = soft.and_then(|n| Outcome::Success(n + 1));
        assert!(matches!(chained, Outcome::Recoverable(_)));

        let chained = Outcome::Success(1).map(|n| n * 10);
        assert_eq!(chained.success(), Some(10));
    }

    #[test]
    fn version_display() {
        let v = Version {
            name: "11.x".into(),
            url: Url::parse("https://laravel.com/docs/11.x").unwrap(),
        };
        assert_eq!(v.to_string(), "11.x (https://laravel.com/docs/11.x)");
    }
}
