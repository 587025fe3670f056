//! Application configuration for laradocs.
//!
//! User config lives at `~/.laradocs/laradocs.toml`.
//! CLI flags override config file values, which override defaults.
//! Library crates never read the file themselves; they receive an [`AppConfig`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LaradocsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "laradocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".laradocs";

// ---------------------------------------------------------------------------
// Config structs (matching laradocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Documentation site location.
    #[serde(default)]
    pub site: SiteConfig,

    /// CSS markers identifying the page regions we read.
    #[serde(default)]
    pub selectors: SiteSelectors,

    /// Where and how Markdown files are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Landing page carrying the version selector.
    #[serde(default = "default_landing_url")]
    pub landing_url: String,

    /// Path prefix under which every documentation page lives.
    #[serde(default = "default_docs_prefix")]
    pub docs_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            landing_url: default_landing_url(),
            docs_prefix: default_docs_prefix(),
        }
    }
}

impl SiteConfig {
    /// Parse the configured landing URL.
    pub fn landing_url(&self) -> Result<Url> {
        Url::parse(&self.landing_url).map_err(|e| {
            LaradocsError::config(format!("invalid landing_url '{}': {e}", self.landing_url))
        })
    }
}

fn default_landing_url() -> String {
    "https://laravel.com/docs".into()
}
fn default_docs_prefix() -> String {
    "/docs/".into()
}

/// `[selectors]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// The `<select>` listing documented versions.
    #[serde(default = "default_version_select")]
    pub version_select: String,

    /// Navigation container holding the page links.
    #[serde(default = "default_sidebar")]
    pub sidebar: String,

    /// Main content region of a page.
    #[serde(default = "default_main_content")]
    pub main_content: String,

    /// A highlighted code block inside the content region.
    #[serde(default = "default_code_block")]
    pub code_block: String,

    /// Element inside a code block carrying the language attribute.
    #[serde(default = "default_code_lang")]
    pub code_lang: String,

    /// Attribute holding the language hint.
    #[serde(default = "default_lang_attribute")]
    pub lang_attribute: String,

    /// Element inside a code block holding the verbatim source.
    #[serde(default = "default_copy_target")]
    pub copy_target: String,

    /// Language used when a code block carries no hint.
    #[serde(default = "default_lang")]
    pub default_lang: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            version_select: default_version_select(),
            sidebar: default_sidebar(),
            main_content: default_main_content(),
            code_block: default_code_block(),
            code_lang: default_code_lang(),
            lang_attribute: default_lang_attribute(),
            copy_target: default_copy_target(),
            default_lang: default_lang(),
        }
    }
}

fn default_version_select() -> String {
    r#"select[aria-label="Laravel version"]"#.into()
}
fn default_sidebar() -> String {
    "div.docs_sidebar".into()
}
fn default_main_content() -> String {
    "section.docs_main".into()
}
fn default_code_block() -> String {
    "div.code-container".into()
}
fn default_code_lang() -> String {
    "code".into()
}
fn default_lang_attribute() -> String {
    "data-lang".into()
}
fn default_copy_target() -> String {
    "div.torchlight-copy-target".into()
}
fn default_lang() -> String {
    "shell".into()
}

impl SiteSelectors {
    /// Parse every CSS selector once, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            version_select: parse_selector("version_select", &self.version_select)?,
            sidebar: parse_selector("sidebar", &self.sidebar)?,
            main_content: parse_selector("main_content", &self.main_content)?,
            code_block: parse_selector("code_block", &self.code_block)?,
            code_lang: parse_selector("code_lang", &self.code_lang)?,
            copy_target: parse_selector("copy_target", &self.copy_target)?,
            lang_attribute: self.lang_attribute.clone(),
            default_lang: self.default_lang.clone(),
            sidebar_css: self.sidebar.clone(),
            main_content_css: self.main_content.clone(),
            version_select_css: self.version_select.clone(),
        })
    }
}

fn parse_selector(field: &str, css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| LaradocsError::config(format!("invalid selectors.{field} '{css}': {e}")))
}

/// Validated selectors, ready for DOM queries.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub version_select: Selector,
    pub sidebar: Selector,
    pub main_content: Selector,
    pub code_block: Selector,
    pub code_lang: Selector,
    pub copy_target: Selector,
    pub lang_attribute: String,
    pub default_lang: String,
    /// Source text of the selectors, kept for diagnostics.
    pub sidebar_css: String,
    pub main_content_css: String,
    pub version_select_css: String,
}

impl Default for CompiledSelectors {
    fn default() -> Self {
        SiteSelectors::default()
            .compile()
            .expect("built-in selectors are valid")
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Parent directory of the per-version output directories.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// How page URLs map to file names.
    #[serde(default)]
    pub filenames: FilenameStrategy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            filenames: FilenameStrategy::default(),
        }
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("docs")
}

/// Mapping from a page URL to its output file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilenameStrategy {
    /// Final path segment only; a later page with the same segment overwrites.
    #[default]
    LastSegment,
    /// Every segment below the version root, joined with `-`.
    FullPath,
}

impl fmt::Display for FilenameStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastSegment => write!(f, "last-segment"),
            Self::FullPath => write!(f, "full-path"),
        }
    }
}

impl FromStr for FilenameStrategy {
    type Err = LaradocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last-segment" => Ok(Self::LastSegment),
            "full-path" => Ok(Self::FullPath),
            other => Err(LaradocsError::config(format!(
                "unknown filename strategy '{other}': expected 'last-segment' or 'full-path'"
            ))),
        }
    }
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause between two page fetches, in milliseconds (0 disables).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("laradocs/", env!("CARGO_PKG_VERSION")).into()
}
fn default_delay_ms() -> u64 {
    100
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.laradocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LaradocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.laradocs/laradocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LaradocsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LaradocsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    init_config_in(&dir)
}

fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| LaradocsError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LaradocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LaradocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
