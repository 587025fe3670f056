//! Version discovery for a documentation site.
//!
//! The landing page publishes a `<select>` listing every documented release.
//! [`discover_versions`] fetches and parses it; [`version_slug`] turns a
//! version's root URL into the directory name its pages are written under.

mod parser;

use regex::Regex;
use tracing::{info, instrument};
use url::Url;

use laradocs_crawler::Fetcher;
use laradocs_shared::{CompiledSelectors, LaradocsError, Result, Version};

pub use parser::parse_versions;

/// Fetch the landing page and list the versions it offers, in page order.
#[instrument(skip_all, fields(landing = %landing))]
pub async fn discover_versions(
    fetcher: &Fetcher,
    landing: &Url,
    selectors: &CompiledSelectors,
) -> Result<Vec<Version>> {
    info!("fetching version list");

    let html = fetcher.fetch(landing).await?;
    let versions = parse_versions(&html, landing, selectors)?;

    info!(count = versions.len(), "versions discovered");
    Ok(versions)
}

/// Extract the path segment that directly follows `docs_prefix`.
///
/// `https://laravel.com/docs/11.x` with prefix `/docs/` gives `11.x`.
pub fn version_slug(url: &Url, docs_prefix: &str) -> Result<String> {
    let pattern = format!("{}([^/]+)", regex::escape(docs_prefix));
    let re = Regex::new(&pattern)
        .map_err(|e| LaradocsError::config(format!("invalid docs_prefix '{docs_prefix}': {e}")))?;

    re.captures(url.path())
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            LaradocsError::validation(format!(
                "could not extract version slug from URL: {url} (expected '{docs_prefix}<version>')"
            ))
        })
}
