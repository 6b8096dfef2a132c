//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A static generator for a personal blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the static site
    #[command(visible_alias = "generate", alias = "g")]
    Build {
        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List posts, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug of the new post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Remove the public folder
    Clean,

    /// Build, then serve the site locally
    #[command(alias = "s", alias = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    let site = Folio::new(&base_dir)?;

    match cli.command {
        Commands::Build { watch } => {
            tracing::info!("Generating static files...");
            site.build()?;
            println!("Generated successfully!");

            if watch {
                tokio::task::spawn_blocking(move || folio::commands::generate::watch(&site))
                    .await??;
            }
        }

        Commands::List { json } => {
            folio::commands::list::run(&site, json)?;
        }

        Commands::New { title, slug } => {
            let path = site.new_post(&title, slug.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve { port, ip, watch } => {
            tracing::info!("Generating static files...");
            site.build()?;
            folio::server::start(&site, &ip, port, watch).await?;
        }
    }

    Ok(())
}
