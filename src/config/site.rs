//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub site_dir: String,
    pub manifest: String,
    pub posts_dir: String,

    // Listing
    pub render_disabled: bool,

    // Links
    pub edit_url: String,
    pub share_url: String,

    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            site_dir: "wwwroot".to_string(),
            manifest: "posts.json".to_string(),
            posts_dir: "posts".to_string(),

            render_disabled: false,

            edit_url: String::new(),
            share_url: "https://twitter.com/intent/tweet?text={title}%20{url}".to_string(),

            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// URL of the post manifest, relative to the site origin
    pub fn manifest_url(&self) -> String {
        format!("/{}", self.manifest.trim_start_matches('/'))
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Escape raw HTML and drop script URLs
    pub safe: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            safe: true,
            smart_punctuation: true,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Light/dark theme persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key under which the dark-mode flag is persisted
    pub storage_key: String,
    /// Attribute applied to the document root
    pub attribute: String,
    /// File used by the CLI's persistent store, relative to the base directory
    pub store_file: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "darkmode".to_string(),
            attribute: "data-theme".to_string(),
            store_file: ".blog/theme.json".to_string(),
        }
    }
}
