//! Post and Page models

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use std::path::PathBuf;

/// Canonical metadata of a published post
#[derive(Debug, Clone, Serialize)]
pub struct PostMetadata {
    pub title: String,

    /// Unique identity and URL path segment
    pub slug: String,

    pub date: DateTime<FixedOffset>,

    pub description: Option<String>,

    /// Post author, the site author is used when absent
    pub author: Option<String>,

    /// Hidden posts stay reachable by slug but are left out of listings
    pub hidden: bool,

    pub published: bool,

    /// Long-form post marker (`isEffortPost`)
    pub effort_post: bool,
}

impl PostMetadata {
    /// Date as an ISO 8601 string
    pub fn iso_date(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn author_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.author.as_deref().unwrap_or(default)
    }
}

/// A blog post: metadata plus the raw markdown body
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub meta: PostMetadata,

    /// Raw markdown content
    pub body: String,

    /// Source file path
    pub source: PathBuf,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn is_visible(&self) -> bool {
        !self.meta.hidden
    }
}

/// A standalone page (About, Blogroll, ...)
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,

    /// Raw markdown content
    pub body: String,

    /// Source file path
    pub source: PathBuf,
}
