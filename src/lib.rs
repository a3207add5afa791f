//! tagblog: a static blog generator
//!
//! Articles are markdown/MDX files whose front-matter is checked against a
//! fixed schema at build time. The generated site has a tag-filterable list
//! view and one page per article with a table of contents and a reading
//! progress bar.

pub mod commands;
pub mod config;
pub mod content;
pub mod filter;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod taxonomy;
pub mod templates;
pub mod toc;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Config file name at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// Which articles a build publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Hidden (`visible: false`) articles are left out
    #[default]
    Production,
    /// Everything is published, hidden articles included
    Development,
}

impl BuildMode {
    pub fn includes_hidden(self) -> bool {
        self == BuildMode::Development
    }
}

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory holding the articles
    pub source_dir: PathBuf,
    /// Static files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let output_dir = base_dir.join(&config.output_dir);

        Self {
            config,
            base_dir,
            source_dir,
            static_dir,
            output_dir,
        }
    }

    /// Generate the static site
    pub fn build(&self, mode: BuildMode) -> Result<generator::BuildReport> {
        commands::build::run(self, mode)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
