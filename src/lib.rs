//! folio: a static generator for a personal blog
//!
//! Markdown posts with YAML front-matter are ordered, linked to their
//! neighbors, rendered with syntax highlighting and published as HTML pages
//! plus an RSS feed.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::ContentError;
pub use generator::BuildSummary;

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open the site in `base_dir`, reading `_config.yml` if there is one
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            pages_dir: base_dir.join(&config.pages_dir),
            static_dir: base_dir.join(&config.static_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        }
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Generate the static site
    pub fn build(&self) -> Result<BuildSummary> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, returning the path of the written file
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}
