//! Page transformation: main content extraction and HTML-to-Markdown conversion.
//!
//! A fetched page is narrowed to its main content region, its code blocks are
//! rewritten into fenced Markdown (see [`code`]), and the rest is converted
//! with the `htmd` crate followed by a few cleanup passes.

mod cleanup;
pub mod code;

use scraper::Html;
use tracing::{debug, instrument, warn};
use url::Url;

use laradocs_shared::{CompiledSelectors, LaradocsError, Outcome, Result};

pub use code::{RewrittenHtml, fence_code_block, placeholder, rewrite_code_blocks};

/// Tags whose content never belongs in the Markdown output.
const SKIP_TAGS: [&str; 5] = ["script", "style", "svg", "noscript", "iframe"];

// ---------------------------------------------------------------------------
// Transformer
// ---------------------------------------------------------------------------

/// Transform a fetched page into its Markdown body (no provenance header).
///
/// A page without the main content region is a recoverable failure: it is
/// logged as a warning and produces no output, the run goes on.
#[instrument(skip(html, selectors), fields(url = %source_url))]
pub fn transform_page(
    html: &str,
    source_url: &Url,
    selectors: &CompiledSelectors,
) -> Outcome<String> {
    let doc = Html::parse_document(html);

    let Some(region) = doc.select(&selectors.main_content).next() else {
        warn!(selector = %selectors.main_content_css, "main content not found, skipping page");
        return Outcome::Recoverable(LaradocsError::parse(format!(
            "could not find main content ({}) for {source_url}",
            selectors.main_content_css
        )));
    };

    let rewritten = rewrite_code_blocks(region, selectors);
    debug!(code_blocks = rewritten.fences.len(), "code blocks rewritten");

    Outcome::recoverable(convert_rewritten(&rewritten))
}

/// Convert a rewritten region to Markdown and put the fences back.
pub fn convert_rewritten(rewritten: &RewrittenHtml) -> Result<String> {
    let raw_markdown = converter()
        .convert(&rewritten.html)
        .map_err(|e| LaradocsError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(raw_len = raw_markdown.len(), "htmd conversion complete");

    let cleaned = cleanup::run_pipeline(&raw_markdown);
    Ok(cleanup::ensure_trailing_newline(&rewritten.restore(&cleaned)))
}

/// HTML-to-Markdown converter.
///
/// `htmd` never hard-wraps text and keeps inline `[text](href)` links, so
/// paragraphs keep their natural flow and link targets survive.
fn converter() -> htmd::HtmlToMarkdown {
    htmd::HtmlToMarkdown::builder()
        .options(htmd::options::Options {
            heading_style: htmd::options::HeadingStyle::Atx,
            code_block_style: htmd::options::CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .skip_tags(SKIP_TAGS.to_vec())
        .build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
