//! Site configuration (_config.yml)

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ContentError, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA name used for front-matter dates without an offset; empty means UTC
    pub timezone: String,

    // URL
    pub url: String,
    pub feed_path: String,

    // Directory
    pub posts_dir: String,
    pub pages_dir: String,
    /// Copied verbatim into the public directory
    pub static_dir: String,
    pub public_dir: String,

    // Writing
    /// Abort the build on the first malformed post instead of skipping it
    pub strict: bool,
    pub hidden_navigation: HiddenNavigation,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Navigation
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "folio".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            feed_path: "feed.xml".to_string(),

            posts_dir: "posts".to_string(),
            pages_dir: "pages".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            strict: false,
            hidden_navigation: HiddenNavigation::default(),
            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),

            menu: vec![
                MenuItem::new("About", "/about"),
                MenuItem::new("Blogroll", "/blogroll"),
                MenuItem::new("RSS", "/feed.xml"),
            ],
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| ContentError::Config(format!("{}: {}", path.display(), e)))?;
        config.timezone()?;
        Ok(config)
    }

    /// Timezone for dates written without an offset
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| ContentError::Config(format!("unknown timezone `{}`: {}", name, e)))
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Top-level output names that no post or page slug may take
    pub fn reserved_slugs(&self) -> Vec<String> {
        let mut reserved = vec!["index.html".to_string(), "404.html".to_string()];
        let feed_root = self
            .feed_path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        if !feed_root.is_empty() && !reserved.iter().any(|r| r == feed_root) {
            reserved.push(feed_root.to_string());
        }
        reserved
    }

    /// Absolute URL of the feed document
    pub fn feed_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.feed_path.trim_start_matches('/'))
    }
}

/// How a hidden post links to its neighbors on its own page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenNavigation {
    /// A hidden post still links to the nearest visible posts around it
    #[default]
    Navigate,
    /// A hidden post has no previous/next links
    Isolate,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Markdown extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub math: bool,
    pub embeds: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            math: true,
            embeds: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}
