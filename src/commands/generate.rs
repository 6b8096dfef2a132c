//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::{BuildSummary, Generator};
use crate::Folio;

/// Load all content and write the site
pub fn run(folio: &Folio) -> Result<BuildSummary> {
    let start = Instant::now();

    let loader = ContentLoader::new(folio);
    let posts = loader.load_posts()?;
    let pages = loader.load_pages()?;

    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let summary = Generator::new(folio)?.generate(&posts, &pages)?;

    if summary.skipped > 0 {
        tracing::warn!("{} post(s) failed to render and were skipped", summary.skipped);
    }
    tracing::info!(
        "Generated {} posts and {} pages in {:.2}s",
        summary.posts,
        summary.pages,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Rebuild whenever content or configuration changes. Blocks until the
/// watcher shuts down.
///
/// The configuration is read again before every rebuild.
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel::<DebounceEventResult>();

    // Debounce so an editor's burst of writes triggers one rebuild
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&folio.posts_dir, &folio.pages_dir, &folio.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = folio.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                match Folio::new(&folio.base_dir).and_then(|folio| run(&folio)) {
                    Ok(_) => tracing::info!("Regenerated successfully"),
                    Err(e) => tracing::error!("Generation failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Editor droppings and VCS internals never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    !path_str.contains(".git")
        && file_name != ".DS_Store"
        && !file_name.ends_with('~')
        && !file_name.ends_with(".swp")
        && !file_name.starts_with(".#")
}
