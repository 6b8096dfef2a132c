//! Generator module - writes the static site using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::{Datelike, Utc};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{MarkdownRenderer, Page, Post, PostCollection};
use crate::feed;
use crate::templates::{NavPost, PageView, PostItem, PostView, SiteData, TemplateRenderer};
use crate::Folio;

/// Counts reported after a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Post pages written, hidden posts included
    pub posts: usize,
    /// Posts whose body failed to render
    pub skipped: usize,
    pub pages: usize,
    /// Items in the feed
    pub feed_items: usize,
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    markdown: MarkdownRenderer,
    renderer: TemplateRenderer,
    site: SiteData,
    current_year: i32,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let tz = folio.config.timezone()?;
        Ok(Self {
            folio: folio.clone(),
            markdown: MarkdownRenderer::from_config(&folio.config),
            renderer: TemplateRenderer::new()?,
            site: SiteData::from_config(&folio.config),
            current_year: Utc::now().with_timezone(&tz).year(),
        })
    }

    /// Pin the year used for post header dates
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &PostCollection, pages: &[Page]) -> Result<BuildSummary> {
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        self.copy_static_assets()?;

        let mut summary = BuildSummary::default();

        self.generate_index(posts)?;
        self.generate_post_pages(posts, &mut summary)?;
        self.generate_page_pages(posts, pages, &mut summary)?;
        self.generate_not_found()?;
        summary.feed_items = self.generate_feed(posts)?;

        Ok(summary)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    /// Homepage: every visible post, newest first
    fn generate_index(&self, posts: &PostCollection) -> Result<()> {
        let items: Vec<PostItem> = posts.visible().into_iter().map(PostItem::from).collect();

        let mut context = self.base_context();
        context.insert("posts", &items);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output(Path::new("index.html"), &html)
    }

    /// One page per post, hidden posts included
    fn generate_post_pages(&self, posts: &PostCollection, summary: &mut BuildSummary) -> Result<()> {
        // par_iter keeps collection order in the collected Vec
        let rendered: Vec<(&Post, _)> = posts
            .posts()
            .par_iter()
            .map(|post| (post, self.markdown.render(&post.body)))
            .collect();

        let policy = self.folio.config.hidden_navigation;

        for (post, content) in rendered {
            let content = match content {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Skipping post `{}`: {}", post.slug(), e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let neighbors = posts.neighbors(post.slug(), policy)?;

            let mut context = self.base_context();
            context.insert(
                "post",
                &PostView::new(post, content, &self.folio.config.author, self.current_year),
            );
            if let Some(previous) = neighbors.previous {
                context.insert("previous", &NavPost::from(previous));
            }
            if let Some(next) = neighbors.next {
                context.insert("next", &NavPost::from(next));
            }

            let html = self.renderer.render("post.html", &context)?;
            self.write_output(&Path::new(post.slug()).join("index.html"), &html)?;
            tracing::debug!("Generated post: {}", post.slug());
            summary.posts += 1;
        }

        Ok(())
    }

    /// Standalone pages (About, Blogroll, ...)
    fn generate_page_pages(
        &self,
        posts: &PostCollection,
        pages: &[Page],
        summary: &mut BuildSummary,
    ) -> Result<()> {
        let mut written: HashSet<&str> = HashSet::new();
        for page in pages {
            if page.slug.is_empty() || !written.insert(&page.slug) {
                tracing::warn!("Skipping page {:?}: empty or repeated slug", page.source);
                continue;
            }
            if posts.get(&page.slug).is_ok() {
                tracing::warn!(
                    "Skipping page {:?}: slug `{}` is taken by a post",
                    page.source,
                    page.slug
                );
                continue;
            }

            let content = match self.markdown.render(&page.body) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Skipping page `{}`: {}", page.slug, e);
                    continue;
                }
            };

            let mut context = self.base_context();
            context.insert(
                "page",
                &PageView {
                    title: page.title.clone(),
                    description: page.description.clone(),
                    content,
                },
            );

            let html = self.renderer.render("page.html", &context)?;
            self.write_output(&Path::new(&page.slug).join("index.html"), &html)?;
            summary.pages += 1;
        }

        Ok(())
    }

    fn generate_not_found(&self) -> Result<()> {
        let html = self.renderer.render("404.html", &self.base_context())?;
        self.write_output(Path::new("404.html"), &html)
    }

    /// RSS feed of the visible posts; a failure here fails the build
    fn generate_feed(&self, posts: &PostCollection) -> Result<usize> {
        let visible = posts.visible();
        let xml = feed::render_feed(&self.folio.config, &self.markdown, &visible)?;
        let feed_path = self.folio.config.feed_path.trim_start_matches('/');
        self.write_output(Path::new(feed_path), &xml)?;
        Ok(visible.len())
    }

    /// Copy the static directory into the public directory as-is
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(static_dir)?;
            let dest = self.folio.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)
                .with_context(|| format!("Failed to copy {:?}", entry.path()))?;
        }

        Ok(())
    }

    fn write_output(&self, relative: &Path, contents: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        Ok(())
    }
}
