//! Content source reader - enumerates markdown files in a content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ContentError, Result};

/// A markdown file as read from disk, before front-matter is split off
#[derive(Debug, Clone)]
pub struct RawPostFile {
    pub path: PathBuf,
    pub text: String,
}

impl RawPostFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// File name without extension
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Read every markdown file directly inside `dir`, ordered by file name.
///
/// A directory that is missing or cannot be listed is an error; an empty
/// directory yields no files.
pub fn read_markdown_dir(dir: &Path) -> Result<Vec<RawPostFile>> {
    fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ContentError::io(path, e.into())
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown_file(path) {
            continue;
        }

        let text = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        files.push(RawPostFile::new(path, text));
    }

    tracing::debug!("Read {} markdown files from {:?}", files.len(), dir);
    Ok(files)
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
