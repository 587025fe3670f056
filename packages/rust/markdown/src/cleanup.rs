//! Post-conversion cleanup passes for Markdown output.
//!
//! Each pass is a function `&str -> String` applied in sequence. Passes that
//! look at line content leave fenced code untouched. Text is never removed:
//! literal tags such as `<div>` in prose or code spans are page content.

/// Run the cleanup passes on converted Markdown.
pub(crate) fn run_pipeline(md: &str) -> String {
    let result = normalize_whitespace(md);
    clean_blank_lines(&result)
}

// ---------------------------------------------------------------------------
// Blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of two or more blank lines outside fenced code into a single
/// blank line.
fn clean_blank_lines(md: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut blank_run = 0;

    for line in md.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        }

        if !in_fence && line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        out.push(line);
    }

    out.join("\n")
}

// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------

/// Trim trailing whitespace on lines outside fenced code.
fn normalize_whitespace(md: &str) -> String {
    map_outside_fences(md, |line| line.trim_end().to_string())
}

/// Ensure the text ends with exactly one newline.
pub(crate) fn ensure_trailing_newline(md: &str) -> String {
    let trimmed = md.trim_end_matches('\n');
    format!("{trimmed}\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn map_outside_fences(md: &str, f: impl Fn(&str) -> String) -> String {
    let mut in_fence = false;

    md.lines()
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
                return line.to_string();
            }
            if in_fence { line.to_string() } else { f(line) }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
