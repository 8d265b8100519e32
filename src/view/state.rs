//! Current-view state: which post is shown and what it contains

use std::sync::Arc;

use crate::content::{MarkdownRenderer, Post, PostIndex, Resolution};
use crate::error::FetchError;

/// Identifies the navigation a content fetch was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// What the host should do after a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Empty path: show the listing
    Listing,
    /// Unknown path: go back to the root listing
    Redirect,
    /// The post's body lives elsewhere; nothing is fetched
    External(Post),
    /// Fetch this post's body and hand it to [`PostView::complete`]
    Fetch(Post, Ticket),
}

/// The post on display and its content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentView {
    post: Option<Post>,
    content: String,
    html: String,
    failed: bool,
}

impl CurrentView {
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Raw markdown of the current post
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Rendered once when the content arrived
    pub fn html(&self) -> &str {
        &self.html
    }

    /// The body could not be fetched
    pub fn failed(&self) -> bool {
        self.failed
    }
}

/// Owns the current view and decides what each navigation does
#[derive(Debug, Clone)]
pub struct PostView {
    index: Arc<PostIndex>,
    current: CurrentView,
    generation: u64,
    pending: Option<u64>,
}

impl PostView {
    pub fn new(index: Arc<PostIndex>) -> Self {
        Self {
            index,
            current: CurrentView::default(),
            generation: 0,
            pending: None,
        }
    }

    pub fn index(&self) -> &PostIndex {
        &self.index
    }

    pub fn current(&self) -> &CurrentView {
        &self.current
    }

    /// Start showing `path`, clearing whatever was displayed before
    pub fn navigate(&mut self, path: Option<&str>) -> Navigation {
        self.generation += 1;
        self.pending = None;
        self.current = CurrentView::default();

        match self.index.resolve(path) {
            Resolution::Listing => Navigation::Listing,
            Resolution::NotFound => {
                tracing::debug!("No post at '{}', redirecting to listing", path.unwrap_or_default());
                Navigation::Redirect
            }
            Resolution::Found(post) => {
                let post = post.clone();
                self.current.post = Some(post.clone());
                if post.is_external {
                    Navigation::External(post)
                } else {
                    self.pending = Some(self.generation);
                    Navigation::Fetch(
                        post,
                        Ticket {
                            generation: self.generation,
                        },
                    )
                }
            }
        }
    }

    /// Accept the result of a content fetch
    ///
    /// Returns false, leaving the view untouched, when the fetch belongs to a
    /// navigation that has since been superseded or already completed.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<String, FetchError>,
        renderer: &MarkdownRenderer,
    ) -> bool {
        if self.pending != Some(ticket.generation) {
            tracing::debug!("Discarding stale content for navigation {}", ticket.generation);
            return false;
        }
        self.pending = None;

        match result {
            Ok(content) => {
                let html = renderer.render(&content);
                self.current.content = content;
                self.current.html = html;
                self.current.failed = false;
            }
            Err(e) => {
                tracing::warn!("Failed to load post content: {}", e);
                self.current.content.clear();
                self.current.html.clear();
                self.current.failed = true;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> PostView {
        let mut external = Post::new("Elsewhere", "https://example.com/x", "2021");
        external.is_external = true;
        let index = PostIndex::new(vec![Post::new("A", "a", "2020"), Post::new("B", "b", "2020"), external]);
        PostView::new(Arc::new(index))
    }

    fn ticket(nav: Navigation) -> Ticket {
        match nav {
            Navigation::Fetch(_, ticket) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_navigate_listing() {
        let mut view = view();
        assert_eq!(view.navigate(None), Navigation::Listing);
        assert!(view.current().post().is_none());
    }

    #[test]
    fn test_navigate_missing_clears_content() {
        let renderer = MarkdownRenderer::new();
        let mut view = view();
        let t = ticket(view.navigate(Some("a")));
        assert!(view.complete(t, Ok("# A".to_string()), &renderer));
        assert!(!view.current().html().is_empty());

        assert_eq!(view.navigate(Some("missing-post")), Navigation::Redirect);
        assert_eq!(view.current(), &CurrentView::default());
    }

    #[test]
    fn test_complete_renders_once() {
        let renderer = MarkdownRenderer::new();
        let mut view = view();
        let t = ticket(view.navigate(Some("a")));
        assert!(view.complete(t, Ok("*hi*".to_string()), &renderer));

        let current = view.current();
        assert_eq!(current.post().map(|p| p.title.as_str()), Some("A"));
        assert_eq!(current.content(), "*hi*");
        assert_eq!(current.html(), "<p><em>hi</em></p>\n");

        // same ticket cannot complete twice
        assert!(!view.complete(t, Ok("other".to_string()), &renderer));
        assert_eq!(view.current().content(), "*hi*");
    }

    #[test]
    fn test_stale_response_discarded() {
        let renderer = MarkdownRenderer::new();
        let mut view = view();
        let first = ticket(view.navigate(Some("a")));
        let second = ticket(view.navigate(Some("b")));

        assert!(!view.complete(first, Ok("from a".to_string()), &renderer));
        assert!(view.current().content().is_empty());

        assert!(view.complete(second, Ok("from b".to_string()), &renderer));
        assert_eq!(view.current().content(), "from b");
        assert_eq!(view.current().post().map(|p| p.path.as_str()), Some("b"));
    }

    #[test]
    fn test_fetch_error_clears_content() {
        let renderer = MarkdownRenderer::new();
        let mut view = view();
        let t = ticket(view.navigate(Some("a")));
        assert!(view.complete(t, Err(FetchError::not_found("/posts/a.md")), &renderer));

        let current = view.current();
        assert!(current.failed());
        assert!(current.content().is_empty());
        assert!(current.html().is_empty());
        assert!(current.post().is_some());
    }

    #[test]
    fn test_external_post_is_not_fetched() {
        let mut view = view();
        match view.navigate(Some("https://example.com/x")) {
            Navigation::External(post) => assert!(post.is_external),
            other => panic!("unexpected navigation: {:?}", other),
        }
    }
}
