//! Post collection - turns raw files into an ordered, validated set of posts

use chrono_tz::Tz;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::neighbors::{self, Neighbors};
use super::{FrontMatter, Post, PostMetadata, RawPostFile};
use crate::config::{HiddenNavigation, SiteConfig};
use crate::error::{ContentError, Result};

/// Options for building a collection, taken from the site config
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Abort on the first malformed post instead of skipping it
    pub strict: bool,
    /// Zone for dates written without an offset
    pub timezone: Tz,
    /// Slugs taken by generated files such as the feed
    pub reserved: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: false,
            timezone: Tz::UTC,
            reserved: SiteConfig::default().reserved_slugs(),
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            strict: config.strict,
            timezone: config.timezone()?,
            reserved: config.reserved_slugs(),
        })
    }
}

/// Published posts, newest first
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    /// Build a collection from raw files.
    ///
    /// Unpublished posts are dropped, malformed ones are skipped with a
    /// warning (or abort the build in strict mode), and duplicate slugs are
    /// always an error. The result is sorted by date descending; posts with
    /// equal dates keep the order of `files`.
    pub fn build(files: &[RawPostFile], options: &LoadOptions) -> Result<Self> {
        let mut posts = Vec::with_capacity(files.len());

        for file in files {
            match parse_post(file, options) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {
                    tracing::debug!("Skipping unpublished post {:?}", file.path);
                }
                Err(e) if options.strict => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping post: {}", e);
                }
            }
        }

        Self::from_posts(posts)
    }

    /// Validate and order already-parsed posts
    pub fn from_posts(mut posts: Vec<Post>) -> Result<Self> {
        posts.retain(|p| p.meta.published);

        let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
        for post in &posts {
            if let Some(first) = seen.insert(post.slug(), &post.source) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug().to_string(),
                    first: first.clone(),
                    second: post.source.clone(),
                });
            }
        }

        // sort_by is stable, so ties keep enumeration order
        posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));

        Ok(Self { posts })
    }

    /// All posts, hidden ones included
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts eligible for listings and the feed
    pub fn visible(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.is_visible()).collect()
    }

    /// Direct lookup by slug; hidden posts are found too
    pub fn get(&self, slug: &str) -> Result<&Post> {
        self.posts
            .iter()
            .find(|p| p.slug() == slug)
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }

    /// Previous/next visible posts around `slug`
    pub fn neighbors(&self, slug: &str, policy: HiddenNavigation) -> Result<Neighbors<'_>> {
        neighbors::resolve(&self.posts, slug, policy)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }
}

/// Parse one file into a post; `Ok(None)` means the post is unpublished
pub fn parse_post(file: &RawPostFile, options: &LoadOptions) -> Result<Option<Post>> {
    if FrontMatter::is_unpublished(&file.text) {
        return Ok(None);
    }

    let (fm, body) = FrontMatter::parse(&file.text)
        .map_err(|e| ContentError::malformed(&file.path, format!("invalid front-matter: {}", e)))?;
    let fm = fm.ok_or_else(|| ContentError::malformed(&file.path, "missing front-matter block"))?;

    if !fm.published {
        return Ok(None);
    }

    let title = required(&file.path, "title", fm.title.as_deref())?;
    let slug = required(&file.path, "slug", fm.slug.as_deref())?;
    check_slug(&file.path, &slug, &options.reserved)?;

    let date_text = fm
        .date_text()
        .ok_or_else(|| ContentError::malformed(&file.path, "missing required field `date`"))?;
    let date = fm.parse_date(options.timezone).ok_or_else(|| {
        ContentError::malformed(&file.path, format!("unparseable date `{}`", date_text))
    })?;

    Ok(Some(Post {
        meta: PostMetadata {
            title,
            slug,
            date,
            description: fm.description,
            author: fm.author,
            hidden: fm.hidden,
            published: fm.published,
            effort_post: fm.effort_post,
        },
        body: body.to_string(),
        source: file.path.clone(),
    }))
}

/// Every slug becomes one directory directly under the public root
pub(crate) fn check_slug(path: &Path, slug: &str, reserved: &[String]) -> Result<()> {
    if slug.is_empty() {
        return Err(ContentError::malformed(path, "slug is empty"));
    }
    if slug.contains('/') || slug == "." || slug == ".." {
        return Err(ContentError::malformed(
            path,
            format!("slug `{}` must be a single path segment", slug),
        ));
    }
    if reserved.iter().any(|r| r == slug) {
        return Err(ContentError::malformed(
            path,
            format!("slug `{}` is reserved for a generated file", slug),
        ));
    }
    Ok(())
}

fn required(path: &Path, field: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ContentError::malformed(
            path,
            format!("missing required field `{}`", field),
        )),
    }
}
