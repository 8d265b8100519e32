//! CLI entry point for blog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-rs")]
#[command(version)]
#[command(about = "A small markdown blog with syntax highlighting and a dark mode", long_about = None)]
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List posts, newest first
    List,

    /// Render a single post to stdout
    Show {
        /// Path (slug) of the post
        path: String,
    },

    /// Show or toggle the persisted light/dark theme
    Theme {
        /// Flip the persisted preference
        #[arg(short, long)]
        toggle: bool,

        /// Ambient color scheme to assume when nothing is persisted
        #[arg(long)]
        prefers_dark: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_rs=debug,info"
    } else {
        "blog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            blog_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::List => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            blog_rs::commands::list::run(&blog).await?;
        }

        Commands::Show { path } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            blog_rs::commands::show::run(&blog, &path).await?;
        }

        Commands::Theme {
            toggle,
            prefers_dark,
        } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            blog_rs::commands::theme::run(&blog, prefers_dark, toggle)?;
        }

        Commands::Server { port, ip, r#static } => {
            let blog = blog_rs::Blog::new(&base_dir)?;
            tracing::info!("Serving {:?} at http://{}:{}", blog.site_dir, ip, port);
            blog_rs::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Version => {
            println!("blog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
