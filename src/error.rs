//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed post {path:?}: {reason}")]
    MalformedPost { path: PathBuf, reason: String },
    #[error("Duplicate slug `{slug}` in {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("No post was found for the slug: {0}")]
    NotFound(String),
    #[error("Failed to render {target}: {reason}")]
    Render { target: String, reason: String },
    #[error("Config error: {0}")]
    Config(String),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedPost {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn render(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::Render {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
