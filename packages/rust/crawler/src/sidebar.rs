//! Page enumeration from a version's navigation sidebar.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use laradocs_shared::{CompiledSelectors, LaradocsError, Result};

use crate::fetch::Fetcher;

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Fetch `base` and return every documentation page linked from its sidebar.
#[instrument(skip_all, fields(base = %base))]
pub async fn enumerate_links(
    fetcher: &Fetcher,
    base: &Url,
    selectors: &CompiledSelectors,
    docs_prefix: &str,
) -> Result<Vec<Url>> {
    let html = fetcher.fetch(base).await?;
    let links = extract_sidebar_links(&html, base, selectors, docs_prefix)?;
    info!(count = links.len(), "sidebar links enumerated");
    Ok(links)
}

/// Collect the sidebar's page links, resolved against `base`.
///
/// An href is kept when it is rooted under `docs_prefix` or is not an
/// absolute `http(s)` URL. Fragment-only, `mailto:` and `javascript:` hrefs
/// are not pages and are dropped. The result is deduplicated and sorted by
/// its serialized form.
pub fn extract_sidebar_links(
    html: &str,
    base: &Url,
    selectors: &CompiledSelectors,
    docs_prefix: &str,
) -> Result<Vec<Url>> {
    let doc = Html::parse_document(html);

    let sidebar = doc.select(&selectors.sidebar).next().ok_or_else(|| {
        LaradocsError::parse(format!(
            "navigation sidebar ({}) not found at {base}",
            selectors.sidebar_css
        ))
    })?;

    let mut links = BTreeSet::new();

    for el in sidebar.select(&LINK_SEL) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };

        if !is_page_href(href, docs_prefix) {
            continue;
        }

        match base.join(href) {
            Ok(resolved) => {
                links.insert(resolved);
            }
            Err(e) => debug!(href, error = %e, "unresolvable href, skipping"),
        }
    }

    Ok(links.into_iter().collect())
}

fn is_page_href(href: &str, docs_prefix: &str) -> bool {
    if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("javascript:") {
        return false;
    }
    href.starts_with(docs_prefix) || !href.starts_with("http")
}

#[cfg(test)]
mod tests {
    use super::*;
    use laradocs_shared::HttpConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PREFIX: &str = "/docs/";

    fn base() -> Url {
        Url::parse("https://laravel.com/docs/11.x").unwrap()
    }

    fn urls(links: &[Url]) -> Vec<&str> {
        links.iter().map(Url::as_str).collect()
    }

    #[test]
    fn keeps_docs_and_relative_links_and_drops_external() {
        let html = r#"<html><body>
            <div class="docs_sidebar"><ul>
                <li><a href="/docs/11.x/installation">Installation</a></li>
                <li><a href="getting-started">Getting Started</a></li>
                <li><a href="https://external.example/x">External</a></li>
            </ul></div>
        </body></html>"#;

        let links =
            extract_sidebar_links(html, &base(), &CompiledSelectors::default(), PREFIX).unwrap();

        assert_eq!(
            urls(&links),
            vec![
                "https://laravel.com/docs/11.x/installation",
                "https://laravel.com/docs/getting-started",
            ]
        );
    }

    #[test]
    fn output_is_deduplicated_and_sorted() {
        let html = r#"<div class="docs_sidebar">
            <a href="/docs/11.x/routing">Routing</a>
            <a href="/docs/11.x/authentication">Auth</a>
            <a href="/docs/11.x/routing">Routing again</a>
            <a href="/docs/11.x/blade">Blade</a>
        </div>"#;

        let links =
            extract_sidebar_links(html, &base(), &CompiledSelectors::default(), PREFIX).unwrap();

        assert_eq!(
            urls(&links),
            vec![
                "https://laravel.com/docs/11.x/authentication",
                "https://laravel.com/docs/11.x/blade",
                "https://laravel.com/docs/11.x/routing",
            ]
        );
    }

    #[test]
    fn ignores_links_outside_sidebar_and_non_pages() {
        let html = r##"<html><body>
            <nav><a href="/docs/11.x/outside">Outside</a></nav>
            <div class="docs_sidebar">
                <a href="#top">Top</a>
                <a href="mailto:team@laravel.com">Mail</a>
                <a>No href</a>
                <a href="/docs/11.x/inside">Inside</a>
            </div>
        </body></html>"##;

        let links =
            extract_sidebar_links(html, &base(), &CompiledSelectors::default(), PREFIX).unwrap();

        assert_eq!(urls(&links), vec!["https://laravel.com/docs/11.x/inside"]);
    }

    #[test]
    fn missing_sidebar_is_parse_error() {
        let html = "<html><body><main><a href=\"/docs/11.x/a\">A</a></main></body></html>";
        let err = extract_sidebar_links(html, &base(), &CompiledSelectors::default(), PREFIX)
            .unwrap_err();
        assert!(matches!(err, LaradocsError::Parse { .. }));
        assert!(err.to_string().contains("div.docs_sidebar"));
    }

    #[test]
    fn empty_sidebar_yields_no_links() {
        let html = r#"<div class="docs_sidebar"><p>Nothing here</p></div>"#;
        let links =
            extract_sidebar_links(html, &base(), &CompiledSelectors::default(), PREFIX).unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn enumerate_links_fetches_base_page() {
        let server = MockServer::start().await;
        let page = r#"<html><body><div class="docs_sidebar">
            <a href="/docs/11.x/installation">Installation</a>
            <a href="/docs/11.x/configuration">Configuration</a>
        </div></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/docs/11.x"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
        let base = Url::parse(&format!("{}/docs/11.x", server.uri())).unwrap();
        let links = enumerate_links(&fetcher, &base, &CompiledSelectors::default(), PREFIX)
            .await
            .unwrap();

        assert_eq!(links.len(), 2);
        assert!(links[0].as_str().ends_with("/docs/11.x/configuration"));
        assert!(links[1].as_str().ends_with("/docs/11.x/installation"));
    }

    #[tokio::test]
    async fn enumerate_links_propagates_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
        let base = Url::parse(&format!("{}/docs/11.x", server.uri())).unwrap();
        let err = enumerate_links(&fetcher, &base, &CompiledSelectors::default(), PREFIX)
            .await
            .unwrap_err();
        assert!(matches!(err, LaradocsError::Network(_)));
    }
}
