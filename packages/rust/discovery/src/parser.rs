//! Parser for the landing page's version selector.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use laradocs_shared::{CompiledSelectors, LaradocsError, Result, Version};

static OPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option").expect("valid selector"));

/// Parse the version `<select>` of a landing page into [`Version`]s.
///
/// Options keep their document order. An option without display text or
/// without a `value` is skipped. Values are resolved against `landing`, so
/// absolute values pass through unchanged.
pub fn parse_versions(
    html: &str,
    landing: &Url,
    selectors: &CompiledSelectors,
) -> Result<Vec<Version>> {
    let doc = Html::parse_document(html);

    let select = doc.select(&selectors.version_select).next().ok_or_else(|| {
        LaradocsError::parse(format!(
            "version selector ({}) not found at {landing}",
            selectors.version_select_css
        ))
    })?;

    let mut versions = Vec::new();

    for option in select.select(&OPTION_SEL) {
        let name = option.text().collect::<String>().trim().to_string();
        let value = option.value().attr("value").unwrap_or("").trim();

        if name.is_empty() || value.is_empty() {
            debug!(name, value, "skipping incomplete version option");
            continue;
        }

        match landing.join(value) {
            Ok(url) => versions.push(Version { name, url }),
            Err(e) => debug!(name, value, error = %e, "skipping unresolvable version URL"),
        }
    }

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landing() -> Url {
        Url::parse("https://laravel.com/docs").unwrap()
    }

    #[test]
    fn parses_options_in_document_order() {
        let html = r#"<html><body>
            <select aria-label="Laravel version">
                <option value="https://laravel.com/docs/master">Master</option>
                <option value="https://laravel.com/docs/11.x" selected> 11.x </option>
                <option value="https://laravel.com/docs/10.x">10.x</option>
            </select>
        </body></html>"#;

        let versions = parse_versions(html, &landing(), &CompiledSelectors::default()).unwrap();
        let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Master", "11.x", "10.x"]);
        assert_eq!(versions[1].url.as_str(), "https://laravel.com/docs/11.x");
    }

    #[test]
    fn skips_malformed_options() {
        let html = r#"<select aria-label="Laravel version">
            <option value="https://laravel.com/docs/12.x">12.x</option>
            <option value="https://laravel.com/docs/11.x">   </option>
            <option>10.x</option>
            <option value="">9.x</option>
            <option value="https://laravel.com/docs/8.x">8.x</option>
        </select>"#;

        let versions = parse_versions(html, &landing(), &CompiledSelectors::default()).unwrap();
        let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["12.x", "8.x"]);
    }

    #[test]
    fn relative_values_resolve_against_landing() {
        let html = r#"<select aria-label="Laravel version">
            <option value="/docs/11.x">11.x</option>
        </select>"#;

        let versions = parse_versions(html, &landing(), &CompiledSelectors::default()).unwrap();
        assert_eq!(versions[0].url.as_str(), "https://laravel.com/docs/11.x");
    }

    #[test]
    fn other_selects_are_ignored() {
        let html = r#"<html><body>
            <select aria-label="Theme"><option value="dark">Dark</option></select>
            <select aria-label="Laravel version">
                <option value="https://laravel.com/docs/11.x">11.x</option>
            </select>
        </body></html>"#;

        let versions = parse_versions(html, &landing(), &CompiledSelectors::default()).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].name, "11.x");
    }

    #[test]
    fn missing_selector_is_parse_error() {
        let html = "<html><body><select><option value=\"x\">x</option></select></body></html>";
        let err = parse_versions(html, &landing(), &CompiledSelectors::default()).unwrap_err();
        assert!(matches!(err, LaradocsError::Parse { .. }));
        assert!(err.to_string().contains("Laravel version"));
    }
}
