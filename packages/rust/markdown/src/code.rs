//! Code block rewriting ahead of HTML-to-Markdown conversion.
//!
//! Highlighted code blocks are deeply nested markup (one span per token, line
//! numbers, copy buttons). Converters flatten that poorly, so each block is
//! turned into a fenced Markdown block first and swapped out of the HTML for
//! a placeholder token. After conversion the tokens are replaced by the
//! fences, which therefore never pass through the converter.

use scraper::ElementRef;
use tracing::debug;

use laradocs_shared::CompiledSelectors;

/// Serialized content region with its code blocks taken out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenHtml {
    /// Region HTML where the n-th code block is replaced by `placeholder(n)`.
    pub html: String,
    /// Fenced blocks in document order.
    pub fences: Vec<String>,
}

impl RewrittenHtml {
    /// Substitute every placeholder in converted Markdown with its fence.
    ///
    /// A placeholder nested in a list item or block quote sits after a line
    /// prefix (`1.  `, `> `, indentation). Every following fence line gets
    /// the same prefix so the block stays inside its container.
    pub fn restore(&self, markdown: &str) -> String {
        let mut result = markdown.to_string();
        for (i, fence) in self.fences.iter().enumerate() {
            let token = placeholder(i);
            let Some(at) = result.find(&token) else {
                continue;
            };

            let line_start = result[..at].rfind('\n').map_or(0, |nl| nl + 1);
            let prefix = continuation_prefix(&result[line_start..at]);
            let block = indent_fence(fence.trim_matches('\n'), &prefix);
            result.replace_range(at..at + token.len(), &block);
        }
        result
    }
}

/// Prefix for the lines after the first: quote markers kept, everything else
/// (list markers, indentation) turned into spaces of the same width.
fn continuation_prefix(lead: &str) -> String {
    lead.chars()
        .map(|c| if c == '>' { '>' } else { ' ' })
        .collect()
}

fn indent_fence(fence: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return fence.to_string();
    }

    fence
        .lines()
        .enumerate()
        .map(|(n, line)| match n {
            0 => line.to_string(),
            _ if line.is_empty() => prefix.trim_end().to_string(),
            _ => format!("{prefix}{line}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Token standing in for the `index`-th code block.
///
/// Plain ASCII letters and digits so the converter emits it unescaped; the
/// `END` suffix keeps `…1END` from matching inside `…10END`.
pub fn placeholder(index: usize) -> String {
    format!("LARADOCSCODEBLOCK{index}END")
}

/// Render a fenced code block: `\n```<lang>\n<text>\n```\n`.
pub fn fence_code_block(lang: Option<&str>, text: &str) -> String {
    format!("\n```{}\n{text}\n```\n", lang.unwrap_or(""))
}

/// Fence for one code block element.
///
/// The language comes from the lang attribute of the first inner code
/// element, falling back to the configured default. The verbatim text comes
/// from the copy target; without one the block's rendered text is fenced
/// with no language.
pub fn render_code_block(block: ElementRef<'_>, selectors: &CompiledSelectors) -> String {
    let lang = block
        .select(&selectors.code_lang)
        .next()
        .and_then(|code| code.value().attr(&selectors.lang_attribute))
        .unwrap_or(selectors.default_lang.as_str());

    match block.select(&selectors.copy_target).next() {
        Some(target) => {
            let text: String = target.text().collect();
            fence_code_block(Some(lang), &text)
        }
        None => {
            let text: String = block.text().collect();
            fence_code_block(None, &text)
        }
    }
}

/// Replace each outermost code block in `region` with a placeholder paragraph.
///
/// The source tree is only read; the rewrite happens on the serialized HTML.
pub fn rewrite_code_blocks(region: ElementRef<'_>, selectors: &CompiledSelectors) -> RewrittenHtml {
    let mut html = region.html();
    let mut fences = Vec::new();

    for block in region.select(&selectors.code_block) {
        if nested_in_code_block(block, region, selectors) {
            continue;
        }

        let outer = block.html();
        if !html.contains(&outer) {
            debug!("code block markup not found in serialized region, leaving as-is");
            continue;
        }

        let token = placeholder(fences.len());
        html = html.replacen(&outer, &format!("<p>{token}</p>"), 1);
        fences.push(render_code_block(block, selectors));
    }

    RewrittenHtml { html, fences }
}

fn nested_in_code_block(
    block: ElementRef<'_>,
    region: ElementRef<'_>,
    selectors: &CompiledSelectors,
) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != region.id())
        .filter_map(ElementRef::wrap)
        .any(|el| selectors.code_block.matches(&el))
}
