//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; the generator fills them with the
//! plain data structures below.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{MenuItem, SiteConfig};
use crate::content::Post;
use crate::helpers::{display_date, feed_tag, list_date, post_path};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("index.html", include_str!("folio/index.html")),
            ("post.html", include_str!("folio/post.html")),
            ("page.html", include_str!("folio/page.html")),
            ("404.html", include_str!("folio/404.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,
    pub feed_tag: String,
    pub math: bool,
    pub menu: Vec<MenuItem>,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.base_url().to_string(),
            language: config.language.clone(),
            feed_tag: feed_tag(config),
            math: config.markdown.math,
            menu: config.menu.clone(),
        }
    }
}

/// A row of the homepage listing
#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    pub title: String,
    pub description: Option<String>,
    pub path: String,
    pub iso_date: String,
    pub list_date: String,
    pub effort_post: bool,
}

impl From<&Post> for PostItem {
    fn from(post: &Post) -> Self {
        Self {
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            path: post_path(post.slug()),
            iso_date: post.meta.iso_date(),
            list_date: list_date(&post.meta.date),
            effort_post: post.meta.effort_post,
        }
    }
}

/// A full post page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub description: Option<String>,
    pub iso_date: String,
    pub display_date: String,
    pub author: String,
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, content: String, default_author: &str, current_year: i32) -> Self {
        Self {
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            iso_date: post.meta.iso_date(),
            display_date: display_date(&post.meta.date, current_year),
            author: post.meta.author_or(default_author).to_string(),
            content,
        }
    }
}

/// Link to a neighboring post
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

impl From<&Post> for NavPost {
    fn from(post: &Post) -> Self {
        Self {
            title: post.meta.title.clone(),
            path: post_path(post.slug()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
}
