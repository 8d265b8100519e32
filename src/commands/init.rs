//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let posts_dir = target_dir.join("wwwroot/posts");
    if target_dir.join("wwwroot/posts.json").exists() {
        anyhow::bail!("{:?} already contains a post manifest", target_dir);
    }
    fs::create_dir_all(&posts_dir)?;

    // Create default _config.yml
    let config_content = r#"# Blog configuration

# Site
title: Blog
description: ''
author: John Doe

# URL
url: http://localhost:4000
root: /

# Directory
site_dir: wwwroot
manifest: posts.json
posts_dir: posts

# Listing
render_disabled: false

# Links ({path}, {title} and {url} are substituted)
edit_url: ''
share_url: https://twitter.com/intent/tweet?text={title}%20{url}

markdown:
  safe: true
  smart_punctuation: true

highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

theme:
  storage_key: darkmode
  attribute: data-theme
  store_file: .blog/theme.json
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    let manifest = r#"[
  {
    "title": "Hello World",
    "path": "hello-world",
    "date": "2026-01-01",
    "enabled": true,
    "isExternal": false
  }
]
"#;
    fs::write(target_dir.join("wwwroot/posts.json"), manifest)?;

    let sample_post = r#"Welcome! This is your very first post.

## Quick Start

Add an entry to `wwwroot/posts.json` and a matching markdown file:

```json
{ "title": "My New Post", "path": "my-new-post", "date": "2026-01-02", "enabled": true, "isExternal": false }
```

### Run server

```bash
$ blog-rs server
```
"#;
    fs::write(posts_dir.join("hello-world.md"), sample_post)?;

    Ok(())
}
