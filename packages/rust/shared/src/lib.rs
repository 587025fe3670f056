//! Shared types, error model, and configuration for laradocs.
//!
//! This crate is the foundation depended on by all other laradocs crates.
//! It provides:
//! - [`LaradocsError`]: the unified error type
//! - [`Outcome`]: tagged success / recoverable / fatal result of a pipeline step
//! - Domain types ([`Version`], [`OutputFile`])
//! - Configuration ([`AppConfig`], [`SiteSelectors`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompiledSelectors, FilenameStrategy, HttpConfig, OutputConfig, SiteConfig,
    SiteSelectors, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{LaradocsError, Result};
pub use types::{Outcome, OutputFile, Version};
