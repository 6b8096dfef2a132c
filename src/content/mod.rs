//! Content module - reads posts and pages and turns them into rendered HTML
//!
//! The pipeline is linear: [`source`] lists markdown files, the
//! [`PostCollection`] parses and orders them, [`neighbors`] links adjacent
//! posts and [`MarkdownRenderer`] produces HTML.

mod collection;
pub mod embed;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod neighbors;
mod post;
pub mod source;

pub use collection::{parse_post, LoadOptions, PostCollection};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use neighbors::Neighbors;
pub use post::{Page, Post, PostMetadata};
pub use source::RawPostFile;
