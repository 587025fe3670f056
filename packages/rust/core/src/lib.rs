//! Scrape orchestration for laradocs.
//!
//! Ties version discovery, sidebar crawling, page transformation and file
//! output into one run driven by [`Scraper`]. Interaction with the user goes
//! through the [`VersionPicker`] and [`Reporter`] seams so the pipeline runs
//! the same behind a terminal UI, a flag, or a test double.

pub mod picker;
pub mod pipeline;
pub mod report;
pub mod writer;

pub use picker::{NamedPicker, VersionPicker};
pub use pipeline::{RunOutcome, RunSummary, SavedPage, Scraper};
pub use report::{Level, Reporter, SilentReporter, TaskProgress};
