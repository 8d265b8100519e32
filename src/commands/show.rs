//! Render one post through the full pipeline

use anyhow::Result;

use crate::view::{HighlightHook, Navigation, Surface};
use crate::Blog;

/// Navigate to `path` and return the highlighted HTML shown for it
pub async fn render(blog: &Blog, path: &str) -> Result<Option<String>> {
    let mut session = blog.session().await;

    match session.navigate(Some(path)).await {
        Navigation::Fetch(..) => {
            let current = session.view().current();
            if current.failed() {
                anyhow::bail!("Post '{}' could not be loaded", path);
            }
            let highlighter = blog.highlighter();
            let mut surface = Surface::new();
            session.commit(&mut surface, &HighlightHook::new(highlighter.as_ref()));
            Ok(Some(surface.html().to_string()))
        }
        Navigation::External(post) => {
            println!("'{}' is an external post: {}", post.title, post.path);
            Ok(None)
        }
        Navigation::Listing | Navigation::Redirect => Ok(None),
    }
}

/// Print the rendered post, or the listing when the path is unknown
pub async fn run(blog: &Blog, path: &str) -> Result<()> {
    match render(blog, path).await? {
        Some(html) => print!("{}", html),
        None => {
            tracing::info!("No post at '{}', showing the listing instead", path);
            super::list::run(blog).await?;
        }
    }
    Ok(())
}
