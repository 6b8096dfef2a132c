//! Create a new post

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Front-matter written into a fresh post
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    slug: &'a str,
    date: String,
    description: &'a str,
    hidden: bool,
}

/// Scaffold `<posts_dir>/<slug>.md`. The slug defaults to the slugified
/// title; an existing file is never overwritten.
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = slug::slugify(slug.unwrap_or(title));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }

    let tz = folio.config.timezone()?;
    let now = Utc::now().with_timezone(&tz);

    let front_matter = serde_yaml::to_string(&Scaffold {
        title,
        slug: &slug,
        date: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        description: "",
        hidden: false,
    })?;

    fs::create_dir_all(&folio.posts_dir)
        .with_context(|| format!("Failed to create {:?}", folio.posts_dir))?;

    let file_path = folio.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, format!("---\n{}---\n\n", front_matter))
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
