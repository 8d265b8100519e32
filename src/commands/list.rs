//! List posts

use anyhow::Result;

use crate::Blog;

/// Print the listing, newest first
pub async fn run(blog: &Blog) -> Result<()> {
    let session = blog.session().await;
    let index = session.view().index();
    let listing = index.listing();

    println!("Posts ({}):", listing.len());
    for post in listing {
        let marker = if post.is_external { " (external)" } else { "" };
        println!("  {} - {} [{}]{}", post.date, post.title, post.path, marker);
    }

    let hidden = index.len() - index.listing().len();
    if hidden > 0 {
        println!("  ({} disabled)", hidden);
    }

    Ok(())
}
