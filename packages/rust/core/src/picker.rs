//! Version selection.

use laradocs_discovery::version_slug;
use laradocs_shared::{LaradocsError, Result, Version};

/// Chooses the version to scrape.
pub trait VersionPicker {
    /// Pick one of `versions`. `Ok(None)` means the user cancelled.
    fn pick(&self, versions: &[Version]) -> Result<Option<Version>>;
}

/// Non-interactive picker matching a display name or a URL slug.
#[derive(Debug, Clone)]
pub struct NamedPicker {
    wanted: String,
    docs_prefix: String,
}

impl NamedPicker {
    pub fn new(wanted: impl Into<String>, docs_prefix: impl Into<String>) -> Self {
        Self {
            wanted: wanted.into(),
            docs_prefix: docs_prefix.into(),
        }
    }
}

impl VersionPicker for NamedPicker {
    fn pick(&self, versions: &[Version]) -> Result<Option<Version>> {
        let wanted = self.wanted.trim();

        let found = versions.iter().find(|v| {
            v.name.eq_ignore_ascii_case(wanted)
                || version_slug(&v.url, &self.docs_prefix).is_ok_and(|slug| slug == wanted)
        });

        match found {
            Some(version) => Ok(Some(version.clone())),
            None => {
                let available: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
                Err(LaradocsError::validation(format!(
                    "version '{wanted}' is not offered; available: {}",
                    available.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn versions() -> Vec<Version> {
        [("Master", "master"), ("12.x", "12.x"), ("11.x", "11.x")]
            .into_iter()
            .map(|(name, slug)| Version {
                name: name.into(),
                url: Url::parse(&format!("https://laravel.com/docs/{slug}")).unwrap(),
            })
            .collect()
    }

    #[test]
    fn picks_by_display_name() {
        let picked = NamedPicker::new("11.x", "/docs/").pick(&versions()).unwrap();
        assert_eq!(picked.unwrap().name, "11.x");
    }

    #[test]
    fn picks_by_slug_and_ignores_name_case() {
        let by_slug = NamedPicker::new("master", "/docs/").pick(&versions()).unwrap();
        assert_eq!(by_slug.unwrap().name, "Master");

        let by_name = NamedPicker::new("MASTER", "/docs/").pick(&versions()).unwrap();
        assert_eq!(by_name.unwrap().name, "Master");
    }

    #[test]
    fn unknown_version_lists_alternatives() {
        let err = NamedPicker::new("4.2", "/docs/").pick(&versions()).unwrap_err();
        assert!(err.to_string().contains("Master, 12.x, 11.x"));
    }
}
