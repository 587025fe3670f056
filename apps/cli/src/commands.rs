//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use laradocs_core::{NamedPicker, RunOutcome, RunSummary, Scraper, VersionPicker};
use laradocs_shared::{
    AppConfig, FilenameStrategy, config_file_path, init_config, load_config, load_config_from,
};
use tracing::{debug, info};
use url::Url;

use crate::output::ConsoleReporter;
use crate::picker::TerminalPicker;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// laradocs: save the Laravel documentation as Markdown files.
#[derive(Parser)]
#[command(
    name = "laradocs",
    version,
    about = "Scrape one version of the Laravel documentation into Markdown files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.laradocs/laradocs.toml.
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Defaults to `scrape`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that take precedence over the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct Overrides {
    /// Docs landing page listing the versions.
    #[arg(long, global = true)]
    pub landing_url: Option<Url>,

    /// Root folder for the generated files.
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Pause between page fetches, in milliseconds.
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// File naming: last-segment or full-path.
    #[arg(long, global = true)]
    pub filenames: Option<FilenameStrategy>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Pick a version and save all of its pages (default).
    Scrape {
        /// Version to scrape without the interactive picker (e.g. 11.x, master).
        #[arg(long)]
        docs_version: Option<String>,
    },

    /// List the versions offered by the docs site.
    Versions,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "laradocs=info",
        1 => "laradocs=debug",
        _ => "laradocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Scrape { docs_version: None });
    let config_path = cli.config_file.as_deref();

    match command {
        Command::Scrape { docs_version } => {
            cmd_scrape(config_path, &cli.overrides, docs_version.as_deref()).await
        }
        Command::Versions => cmd_versions(config_path, &cli.overrides).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path, &cli.overrides),
        },
    }
}

/// Load the config file (or defaults) and apply flag overrides on top.
fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };

    if let Some(url) = &overrides.landing_url {
        config.site.landing_url = url.to_string();
    }
    if let Some(out) = &overrides.out {
        config.output.root = out.clone();
    }
    if let Some(delay) = overrides.delay_ms {
        config.http.delay_ms = delay;
    }
    if let Some(strategy) = overrides.filenames {
        config.output.filenames = strategy;
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    config_path: Option<&Path>,
    overrides: &Overrides,
    docs_version: Option<&str>,
) -> Result<ExitCode> {
    let config = resolve_config(config_path, overrides)?;
    info!(
        landing_url = %config.site.landing_url,
        out = %config.output.root.display(),
        filenames = %config.output.filenames,
        "starting scrape"
    );

    let scraper = Scraper::new(config)?;
    let reporter = ConsoleReporter::new();

    let picker: Box<dyn VersionPicker> = match docs_version {
        Some(name) => Box::new(NamedPicker::new(name, &scraper.config().site.docs_prefix)),
        None => Box::new(TerminalPicker),
    };

    let cancel = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    match scraper.run(picker.as_ref(), &reporter, cancel).await {
        Ok(RunOutcome::Completed(summary)) => {
            print_summary(&summary);
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::Cancelled(summary)) => {
            debug!(saved = summary.saved, "stopped after cancel");
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::NoSelection) => Ok(ExitCode::SUCCESS),
        // Already reported to the user by the pipeline.
        Err(e) => {
            debug!(error = %e, "scrape aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("  Version:  {}", summary.version.name);
    println!("  Folder:   {}", summary.output_dir.display());
    println!("  Saved:    {}/{}", summary.saved, summary.total);
    println!("  Skipped:  {}", summary.skipped);
    if summary.collisions > 0 {
        println!(
            "  Overwritten by name collisions: {} (try --filenames full-path)",
            summary.collisions
        );
    }
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

async fn cmd_versions(config_path: Option<&Path>, overrides: &Overrides) -> Result<ExitCode> {
    let config = resolve_config(config_path, overrides)?;
    let scraper = Scraper::new(config)?;

    let versions = scraper.versions().await?;
    let width = versions.iter().map(|v| v.name.len()).max().unwrap_or(0);
    for version in &versions {
        println!("{:<width$}  {}", version.name, version.url);
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_config_init() -> Result<ExitCode> {
    let path = config_file_path()?;
    if path.exists() {
        println!("Config already exists at: {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(config_path: Option<&Path>, overrides: &Overrides) -> Result<ExitCode> {
    let config = resolve_config(config_path, overrides)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}
