//! Persistence of converted pages: file naming, provenance header, disk writes.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use url::Url;

use laradocs_discovery::version_slug;
use laradocs_shared::{FilenameStrategy, LaradocsError, Outcome, OutputFile, Result, Version};

/// File name stem for a page URL.
///
/// With [`FilenameStrategy::LastSegment`] this is the final path segment, or
/// `index` when the path is empty or ends in `/`. With
/// [`FilenameStrategy::FullPath`] every segment below `<docs_prefix><version>/`
/// is joined with `-`.
pub fn page_slug(url: &Url, strategy: FilenameStrategy, docs_prefix: &str) -> String {
    let slug = match strategy {
        FilenameStrategy::LastSegment => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string(),
        FilenameStrategy::FullPath => {
            let path = url.path();
            let below_version = match path.strip_prefix(docs_prefix) {
                // Drop the version segment itself.
                Some(rest) => rest.split_once('/').map_or("", |(_, tail)| tail),
                None => path,
            };
            below_version
                .split('/')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        }
    };

    if slug.is_empty() { "index".to_string() } else { slug }
}

/// Build the file for `url`: `<dir>/<slug>.md` holding the provenance header
/// `# Source: <url>`, a blank line, then the Markdown body.
pub fn output_file(
    dir: &Path,
    url: &Url,
    markdown: &str,
    strategy: FilenameStrategy,
    docs_prefix: &str,
) -> OutputFile {
    let slug = page_slug(url, strategy, docs_prefix);
    OutputFile {
        path: dir.join(format!("{slug}.md")),
        content: format!("# Source: {url}\n\n{markdown}"),
    }
}

/// Write `file` to disk, replacing any existing file at its path.
#[instrument(skip(file), fields(path = %file.path.display()))]
pub fn write_page(file: &OutputFile) -> Outcome<PathBuf> {
    let result = std::fs::write(&file.path, &file.content)
        .map(|()| file.path.clone())
        .map_err(|e| LaradocsError::io(&file.path, e));

    if result.is_ok() {
        debug!(bytes = file.content.len(), "page written");
    }
    Outcome::recoverable(result)
}

/// Create `<root>/<version-slug>` and return the slug and the directory.
///
/// Already existing directories are fine. A version URL without a slug after
/// `docs_prefix` is an error, raised before anything is created.
pub fn prepare_output_dir(
    root: &Path,
    version: &Version,
    docs_prefix: &str,
) -> Result<(String, PathBuf)> {
    let slug = version_slug(&version.url, docs_prefix)?;
    let dir = root.join(&slug);

    std::fs::create_dir_all(&dir).map_err(|e| LaradocsError::io(&dir, e))?;
    debug!(dir = %dir.display(), "output directory ready");

    Ok((slug, dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "/docs/";

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn last_segment_slug() {
        let u = url("https://laravel.com/docs/11.x/installation");
        assert_eq!(page_slug(&u, FilenameStrategy::LastSegment, PREFIX), "installation");
    }

    #[test]
    fn trailing_slash_and_root_become_index() {
        for raw in ["https://laravel.com/docs/11.x/", "https://laravel.com", "https://laravel.com/"] {
            assert_eq!(
                page_slug(&url(raw), FilenameStrategy::LastSegment, PREFIX),
                "index",
                "{raw}"
            );
        }
    }

    #[test]
    fn full_path_slug_namespaces_below_version() {
        let u = url("https://laravel.com/docs/11.x/packages/sail");
        assert_eq!(page_slug(&u, FilenameStrategy::FullPath, PREFIX), "packages-sail");

        let root = url("https://laravel.com/docs/11.x");
        assert_eq!(page_slug(&root, FilenameStrategy::FullPath, PREFIX), "index");

        let outside = url("https://laravel.com/api/guide");
        assert_eq!(page_slug(&outside, FilenameStrategy::FullPath, PREFIX), "api-guide");
    }

    #[test]
    fn output_file_has_path_and_header() {
        let u = url("https://laravel.com/docs/11.x/installation");
        let file = output_file(
            Path::new("docs/11.x"),
            &u,
            "# Installation\n",
            FilenameStrategy::LastSegment,
            PREFIX,
        );

        assert_eq!(file.path, PathBuf::from("docs/11.x/installation.md"));
        assert_eq!(
            file.content.lines().next(),
            Some("# Source: https://laravel.com/docs/11.x/installation")
        );
        assert_eq!(
            file.content,
            "# Source: https://laravel.com/docs/11.x/installation\n\n# Installation\n"
        );
    }

    #[test]
    fn write_page_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = OutputFile {
            path: tmp.path().join("routing.md"),
            content: "# Source: x\n\nfirst, longer content\n".into(),
        };
        assert!(write_page(&file).is_success());

        let second = OutputFile {
            content: "# Source: x\n\nsecond\n".into(),
            ..file
        };
        let written = write_page(&second).success().unwrap();

        assert_eq!(std::fs::read_to_string(written).unwrap(), "# Source: x\n\nsecond\n");
    }

    #[test]
    fn write_page_keeps_unicode() {
        let tmp = tempfile::tempdir().unwrap();
        let file = OutputFile {
            path: tmp.path().join("localization.md"),
            content: "# Source: x\n\nÜbersetzung — 翻訳 ✓\n".into(),
        };
        let path = write_page(&file).success().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), file.content);
    }

    #[test]
    fn write_failure_is_recoverable() {
        let tmp = tempfile::tempdir().unwrap();
        let file = OutputFile {
            path: tmp.path().join("missing-dir").join("page.md"),
            content: String::new(),
        };
        assert!(matches!(
            write_page(&file),
            Outcome::Recoverable(LaradocsError::Io { .. })
        ));
    }

    #[test]
    fn prepare_output_dir_creates_version_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("docs");
        let version = Version {
            name: "11.x".into(),
            url: url("https://laravel.com/docs/11.x"),
        };

        let (slug, dir) = prepare_output_dir(&root, &version, PREFIX).unwrap();
        assert_eq!(slug, "11.x");
        assert_eq!(dir, root.join("11.x"));
        assert!(dir.is_dir());

        // Second call is a no-op.
        assert!(prepare_output_dir(&root, &version, PREFIX).is_ok());
    }

    #[test]
    fn prepare_output_dir_rejects_unexpected_url() {
        let tmp = tempfile::tempdir().unwrap();
        let version = Version {
            name: "API".into(),
            url: url("https://laravel.com/api"),
        };

        let err = prepare_output_dir(tmp.path(), &version, PREFIX).unwrap_err();
        assert!(matches!(err, LaradocsError::Validation { .. }));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
