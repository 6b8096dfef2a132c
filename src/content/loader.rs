//! Content loader - loads posts and pages from the site directories

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use super::collection::check_slug;
use super::source::{self, RawPostFile};
use super::{FrontMatter, LoadOptions, Page, PostCollection};
use crate::error::ContentError;
use crate::Folio;

/// Loads content from the site directories
pub struct ContentLoader<'a> {
    folio: &'a Folio,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    /// Load and order all published posts.
    ///
    /// The posts directory must exist; a missing one fails the build.
    pub fn load_posts(&self) -> Result<PostCollection> {
        let options = LoadOptions::from_config(&self.folio.config)?;
        let files = source::read_markdown_dir(&self.folio.posts_dir)
            .with_context(|| format!("Failed to read posts from {:?}", self.folio.posts_dir))?;
        let posts = PostCollection::build(&files, &options)?;

        tracing::debug!(
            "Loaded {} of {} post files from {:?}",
            posts.len(),
            files.len(),
            self.folio.posts_dir
        );
        Ok(posts)
    }

    /// Load standalone pages. Pages are optional, so a missing directory
    /// yields none.
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let pages_dir = &self.folio.pages_dir;
        if !pages_dir.exists() {
            tracing::debug!("No pages directory at {:?}", pages_dir);
            return Ok(Vec::new());
        }

        let reserved = self.folio.config.reserved_slugs();
        let mut pages: Vec<Page> = Vec::new();
        for file in source::read_markdown_dir(pages_dir)? {
            match parse_page(&file, &reserved) {
                Ok(Some(page)) => pages.push(page),
                Ok(None) => {}
                Err(e) if self.folio.config.strict => return Err(e.into()),
                Err(e) => tracing::warn!("Skipping page: {}", e),
            }
        }

        let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
        for page in &pages {
            if let Some(first) = seen.insert(&page.slug, &page.source) {
                return Err(ContentError::DuplicateSlug {
                    slug: page.slug.clone(),
                    first: first.clone(),
                    second: page.source.clone(),
                }
                .into());
            }
        }

        Ok(pages)
    }
}

/// Parse a standalone page; the slug defaults to the slugified file name
pub fn parse_page(file: &RawPostFile, reserved: &[String]) -> Result<Option<Page>, ContentError> {
    if FrontMatter::is_unpublished(&file.text) {
        return Ok(None);
    }

    let (fm, body) = FrontMatter::parse(&file.text)
        .map_err(|e| ContentError::malformed(&file.path, format!("invalid front-matter: {}", e)))?;
    let fm = fm.unwrap_or_default();

    if !fm.published {
        return Ok(None);
    }

    let title = fm
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ContentError::malformed(&file.path, "missing required field `title`"))?;
    let slug = fm
        .slug
        .map(|s| slug::slugify(&s))
        .unwrap_or_else(|| slug::slugify(file.stem()));
    check_slug(&file.path, &slug, reserved)?;

    Ok(Some(Page {
        title,
        slug,
        description: fm.description,
        body: body.to_string(),
        source: file.path.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn reserved() -> Vec<String> {
        SiteConfig::default().reserved_slugs()
    }

    fn site_with_pages(pages: &[(&str, &str)]) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let pages_dir = dir.path().join("pages");
        fs::create_dir_all(&pages_dir).unwrap();
        for (name, text) in pages {
            fs::write(pages_dir.join(name), text).unwrap();
        }
        let folio = Folio::with_config(dir.path().to_path_buf(), SiteConfig::default());
        (dir, folio)
    }

    #[test]
    fn test_parse_page_slug_from_file_name() {
        let file = RawPostFile::new("pages/About Me.md", "---\ntitle: About me\n---\nHello");
        let page = parse_page(&file, &reserved()).unwrap().unwrap();
        assert_eq!(page.slug, "about-me");
        assert_eq!(page.title, "About me");
        assert_eq!(page.body, "Hello");
    }

    #[test]
    fn test_parse_page_explicit_slug() {
        let file = RawPostFile::new("pages/x.md", "---\ntitle: Links\nslug: blogroll\n---\n");
        assert_eq!(parse_page(&file, &reserved()).unwrap().unwrap().slug, "blogroll");
    }

    #[test]
    fn test_parse_page_requires_title() {
        let file = RawPostFile::new("pages/x.md", "no front-matter");
        assert!(matches!(
            parse_page(&file, &reserved()),
            Err(ContentError::MalformedPost { .. })
        ));
    }

    #[test]
    fn test_parse_page_empty_slug_is_malformed() {
        let explicit = RawPostFile::new("pages/x.md", "---\ntitle: X\nslug: \"!!!\"\n---\n");
        assert!(matches!(
            parse_page(&explicit, &reserved()),
            Err(ContentError::MalformedPost { .. })
        ));

        let from_name = RawPostFile::new("pages/---.md", "---\ntitle: Dashes\n---\n");
        assert!(matches!(
            parse_page(&from_name, &reserved()),
            Err(ContentError::MalformedPost { .. })
        ));
    }

    #[test]
    fn test_parse_page_reserved_slug_is_malformed() {
        let config = SiteConfig {
            feed_path: "rss/feed.xml".to_string(),
            ..Default::default()
        };
        let file = RawPostFile::new("pages/x.md", "---\ntitle: Feed\nslug: RSS\n---\n");
        assert!(matches!(
            parse_page(&file, &config.reserved_slugs()),
            Err(ContentError::MalformedPost { .. })
        ));
    }

    #[test]
    fn test_load_pages_skips_empty_slug() {
        let (_dir, folio) = site_with_pages(&[
            ("about.md", "---\ntitle: About\n---\nHi"),
            ("bang.md", "---\ntitle: Bang\nslug: \"!!!\"\n---\nHome?"),
        ]);
        let pages = ContentLoader::new(&folio).load_pages().unwrap();
        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["about"]);
    }

    #[test]
    fn test_load_pages_rejects_duplicate_slugs() {
        let (_dir, folio) = site_with_pages(&[
            ("a.md", "---\ntitle: One\nslug: links\n---\n"),
            ("b.md", "---\ntitle: Two\nslug: links\n---\n"),
        ]);
        let err = ContentLoader::new(&folio).load_pages().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::DuplicateSlug { slug, .. }) if slug == "links"
        ));
    }

    #[test]
    fn test_parse_page_loosely_typed_draft_is_dropped() {
        let file = RawPostFile::new("pages/x.md", "---\ntitle: [a]\npublished: false\n---\n");
        assert!(parse_page(&file, &reserved()).unwrap().is_none());
    }
}
