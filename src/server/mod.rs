//! Development server for the generated site

use anyhow::Result;
use axum::Router;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::commands::generate;
use crate::Folio;

/// Serve `public_dir`: directories answer with their `index.html`, unknown
/// paths with the generated `404.html`
pub fn router(public_dir: &Path) -> Router {
    let not_found = ServeFile::new(public_dir.join("404.html"));
    let files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(not_found);

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Resolve the address to bind, accepting host names such as `localhost`
pub fn bind_addr(ip: &str, port: u16) -> Result<SocketAddr> {
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    (bind_ip, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Cannot resolve address {}:{}", ip, port))
}

/// Start the development server. With `watch`, content changes trigger a
/// rebuild in the background.
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let addr = bind_addr(ip, port)?;
    let app = router(&folio.public_dir);

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let folio = folio.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = generate::watch(&folio) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
