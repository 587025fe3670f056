//! HTTP fetching and page enumeration.
//!
//! This crate provides:
//! - [`Fetcher`]: GET requests with non-2xx statuses reported as errors
//! - [`enumerate_links`]: documentation page URLs from a version's sidebar

pub mod fetch;
pub mod sidebar;

pub use fetch::Fetcher;
pub use sidebar::{enumerate_links, extract_sidebar_links};
