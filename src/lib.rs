//! blog-rs: a small markdown blog
//!
//! Posts are listed in a JSON manifest (`posts.json`) and each post's body is
//! a markdown file (`posts/{path}.md`). Navigating to a path resolves it
//! against the manifest, fetches and renders the body, attaches it to a
//! display surface and highlights its code blocks. A light/dark preference is
//! persisted independently of the posts.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod theme;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{Highlighter, NoHighlight, SyntectHighlighter};
use fetch::SiteTransport;
use theme::FileThemeStore;
use view::Pipeline;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory served as the site origin
    pub site_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let site_dir = base_dir.join(&config.site_dir);

        Ok(Self {
            config,
            base_dir,
            site_dir,
        })
    }

    /// Transport over the site directory
    pub fn transport(&self) -> SiteTransport {
        SiteTransport::new(&self.site_dir)
    }

    /// Start a pipeline session: the manifest is loaded once here
    pub async fn session(&self) -> Pipeline<SiteTransport> {
        Pipeline::start(self.transport(), &self.config).await
    }

    /// Code highlighter for the post-render hook
    pub fn highlighter(&self) -> Box<dyn Highlighter + Send + Sync> {
        if self.config.highlight.enable {
            Box::new(SyntectHighlighter::with_options(&self.config.highlight))
        } else {
            Box::new(NoHighlight)
        }
    }

    /// Persistent theme preference used by the CLI
    pub fn theme_store(&self) -> FileThemeStore {
        FileThemeStore::new(
            self.base_dir.join(&self.config.theme.store_file),
            &self.config.theme.storage_key,
        )
    }
}
