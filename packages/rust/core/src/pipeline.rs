//! End-to-end scrape: versions → selection → sidebar links → fetch, transform, write.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};
use url::Url;

use laradocs_crawler::{Fetcher, enumerate_links};
use laradocs_discovery::discover_versions;
use laradocs_markdown::transform_page;
use laradocs_shared::{AppConfig, CompiledSelectors, LaradocsError, Outcome, Result, Version};

use crate::picker::VersionPicker;
use crate::report::{Level, Reporter, TaskProgress};
use crate::writer::{output_file, prepare_output_dir, write_page};

/// A page that made it to disk.
#[derive(Debug, Clone)]
pub struct SavedPage {
    pub url: Url,
    pub path: PathBuf,
}

/// Counters for one version's scrape.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The version that was scraped.
    pub version: Version,
    /// Directory name derived from the version URL (e.g. `11.x`).
    pub version_slug: String,
    /// Where the Markdown files went.
    pub output_dir: PathBuf,
    /// Pages listed in the sidebar.
    pub total: usize,
    /// Pages written.
    pub saved: usize,
    /// Pages skipped after a recoverable failure.
    pub skipped: usize,
    /// Writes that replaced a file written earlier in the same run.
    pub collisions: usize,
    pub elapsed: Duration,
}

/// How a run ended when it did not abort.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The picker returned no version; nothing was fetched or written.
    NoSelection,
    /// Every listed page was processed.
    Completed(RunSummary),
    /// Interrupted by the cancel signal; files written so far are kept.
    Cancelled(RunSummary),
}

/// Pipeline driver owning the config, the compiled selectors and the HTTP client.
pub struct Scraper {
    config: AppConfig,
    selectors: CompiledSelectors,
    fetcher: Fetcher,
}

impl Scraper {
    /// Validate the config and build the HTTP client.
    pub fn new(config: AppConfig) -> Result<Self> {
        let selectors = config.selectors.compile()?;
        let fetcher = Fetcher::new(&config.http)?;
        Ok(Self {
            config,
            selectors,
            fetcher,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Versions offered by the landing page. An empty list is an error.
    pub async fn versions(&self) -> Result<Vec<Version>> {
        let landing = self.config.site.landing_url()?;
        let versions = discover_versions(&self.fetcher, &landing, &self.selectors).await?;

        if versions.is_empty() {
            return Err(LaradocsError::validation(format!(
                "the version selector at {landing} lists no versions"
            )));
        }
        Ok(versions)
    }

    /// Page URLs for `version`, sorted. An empty list is an error.
    pub async fn links(&self, version: &Version) -> Result<Vec<Url>> {
        let links = enumerate_links(
            &self.fetcher,
            &version.url,
            &self.selectors,
            &self.config.site.docs_prefix,
        )
        .await?;

        if links.is_empty() {
            return Err(LaradocsError::validation(format!(
                "the sidebar at {} links no documentation pages",
                version.url
            )));
        }
        Ok(links)
    }

    /// Fetch, transform and write one page into `dir`.
    ///
    /// Fetch, layout and single-file write failures only concern this page
    /// and come back as [`Outcome::Recoverable`]. A write that fails because
    /// `dir` itself is gone is [`Outcome::Fatal`]: every later page would
    /// fail the same way.
    #[instrument(skip(self, dir), fields(url = %url))]
    pub async fn process_page(&self, url: &Url, dir: &Path) -> Outcome<SavedPage> {
        let outcome = Outcome::recoverable(self.fetcher.fetch(url).await)
            .and_then(|html| transform_page(&html, url, &self.selectors))
            .and_then(|markdown| {
                let file = output_file(
                    dir,
                    url,
                    &markdown,
                    self.config.output.filenames,
                    &self.config.site.docs_prefix,
                );
                write_page(&file).map(|path| SavedPage {
                    url: url.clone(),
                    path,
                })
            });

        match outcome {
            Outcome::Recoverable(err @ LaradocsError::Io { .. }) if !dir.is_dir() => {
                error!(dir = %dir.display(), "output folder disappeared");
                Outcome::Fatal(err)
            }
            other => other,
        }
    }

    /// Full run: list versions, let `picker` choose one, scrape it.
    ///
    /// `Err` means the run was aborted; the reason has already been reported.
    pub async fn run<C>(
        &self,
        picker: &dyn VersionPicker,
        reporter: &dyn Reporter,
        cancel: C,
    ) -> Result<RunOutcome>
    where
        C: Future<Output = ()>,
    {
        reporter.report(Level::Info, "Searching for available versions...");
        let versions = self.versions().await.map_err(|e| {
            let message = format!("Could not find any versions ({e}). Aborting.");
            abort(reporter, &message, e)
        })?;
        reporter.report(
            Level::Success,
            &format!("Found {} versions.", versions.len()),
        );

        let selected = match picker.pick(&versions) {
            Ok(Some(version)) => version,
            Ok(None) => {
                reporter.report(Level::Warning, "No version selected. Exiting program.");
                return Ok(RunOutcome::NoSelection);
            }
            Err(e) => {
                let message = format!("Version selection failed: {e}");
                return Err(abort(reporter, &message, e));
            }
        };

        self.scrape_version(&selected, reporter, cancel).await
    }

    /// Scrape every sidebar page of `version` into `<output root>/<slug>`.
    ///
    /// Pages are handled one at a time, in sorted URL order. `cancel` is
    /// raced against every fetch and pause; once it resolves no further page
    /// is started.
    #[instrument(skip_all, fields(version = %version.name))]
    pub async fn scrape_version<C>(
        &self,
        version: &Version,
        reporter: &dyn Reporter,
        cancel: C,
    ) -> Result<RunOutcome>
    where
        C: Future<Output = ()>,
    {
        let start = Instant::now();

        let (slug, dir) = prepare_output_dir(
            &self.config.output.root,
            version,
            &self.config.site.docs_prefix,
        )
        .map_err(|e| {
            let message = format!("Could not prepare the output folder: {e}");
            abort(reporter, &message, e)
        })?;
        reporter.report(
            Level::Info,
            &format!("Files will be saved in the '{}' folder.", dir.display()),
        );

        let mut summary = RunSummary {
            version: version.clone(),
            version_slug: slug.clone(),
            output_dir: dir.clone(),
            total: 0,
            saved: 0,
            skipped: 0,
            collisions: 0,
            elapsed: Duration::ZERO,
        };

        tokio::pin!(cancel);

        let links = tokio::select! {
            biased;
            () = &mut cancel => return Ok(cancelled(reporter, None, summary, start)),
            links = self.links(version) => links,
        };
        let links = links.map_err(|e| {
            let message = format!("No links to scrape found ({e}). Aborting.");
            abort(reporter, &message, e)
        })?;

        summary.total = links.len();
        reporter.report(
            Level::Success,
            &format!("Found {} documentation pages.", links.len()),
        );

        let task = reporter.task(&format!("Scraping v{slug}"), links.len());
        let delay = Duration::from_millis(self.config.http.delay_ms);
        let mut written: HashMap<PathBuf, Url> = HashMap::new();

        for (i, url) in links.iter().enumerate() {
            let outcome = tokio::select! {
                biased;
                () = &mut cancel => return Ok(cancelled(reporter, Some(task.as_ref()), summary, start)),
                outcome = self.process_page(url, &dir) => outcome,
            };

            match outcome {
                Outcome::Success(page) => {
                    if let Some(previous) = written.insert(page.path.clone(), page.url.clone()) {
                        if previous != page.url {
                            summary.collisions += 1;
                            warn!(path = %page.path.display(), %previous, url = %page.url, "file name collision");
                            reporter.report(
                                Level::Warning,
                                &format!(
                                    "{} overwrites {} written for {previous}",
                                    page.url,
                                    page.path.display()
                                ),
                            );
                        }
                    }
                    summary.saved += 1;
                    reporter.report(
                        Level::Success,
                        &format!("Saved: {}", page.path.display()),
                    );
                }
                Outcome::Recoverable(e) => {
                    summary.skipped += 1;
                    warn!(%url, error = %e, "page skipped");
                    let level = match e {
                        LaradocsError::Parse { .. } => Level::Warning,
                        _ => Level::Error,
                    };
                    reporter.report(level, &format!("Skipped {url}: {e}"));
                }
                Outcome::Fatal(e) => {
                    task.finish();
                    let message = format!("Scraping stopped at {url}: {e}");
                    return Err(abort(reporter, &message, e));
                }
            }
            task.advance();

            if !delay.is_zero() && i + 1 < links.len() {
                tokio::select! {
                    biased;
                    () = &mut cancel => return Ok(cancelled(reporter, Some(task.as_ref()), summary, start)),
                    () = tokio::time::sleep(delay) => {}
                }
            }
        }

        task.finish();
        summary.elapsed = start.elapsed();

        info!(
            saved = summary.saved,
            skipped = summary.skipped,
            collisions = summary.collisions,
            elapsed_ms = summary.elapsed.as_millis(),
            "scrape complete"
        );
        reporter.report(Level::Success, "Scraping complete!");
        reporter.report(
            Level::Success,
            &format!(
                "All files for version '{slug}' have been saved in the '{}' folder.",
                dir.display()
            ),
        );

        Ok(RunOutcome::Completed(summary))
    }
}

/// Report a run-aborting failure and hand the error back.
fn abort(reporter: &dyn Reporter, message: &str, err: LaradocsError) -> LaradocsError {
    error!(error = %err, "run aborted");
    reporter.report(Level::Error, message);
    err
}

fn cancelled(
    reporter: &dyn Reporter,
    task: Option<&dyn TaskProgress>,
    mut summary: RunSummary,
    start: Instant,
) -> RunOutcome {
    if let Some(task) = task {
        task.finish();
    }
    summary.elapsed = start.elapsed();

    warn!(saved = summary.saved, "run canceled by user");
    reporter.report(
        Level::Warning,
        "Scraping process canceled by user. Exiting program.",
    );
    RunOutcome::Cancelled(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
