//! Navigation pipeline: resolve, fetch, render, attach, hook

use std::sync::Arc;

use super::{Navigation, PostView, RenderHook, Surface};
use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, PostIndex};
use crate::fetch::{ContentFetcher, Transport};

/// Drives one session's navigations against a transport
pub struct Pipeline<T> {
    fetcher: ContentFetcher<T>,
    renderer: MarkdownRenderer,
    view: PostView,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(transport: T, renderer: MarkdownRenderer, index: Arc<PostIndex>, posts_dir: &str) -> Self {
        Self {
            fetcher: ContentFetcher::new(transport, posts_dir),
            renderer,
            view: PostView::new(index),
        }
    }

    /// Start a session: load the manifest once, then wait for navigations
    pub async fn start(transport: T, config: &SiteConfig) -> Self {
        let index = PostIndex::load_or_empty(&transport, &config.manifest_url())
            .await
            .include_disabled(config.render_disabled);
        let renderer = MarkdownRenderer::with_options(&config.markdown);
        Self::new(transport, renderer, Arc::new(index), &config.posts_dir)
    }

    pub fn view(&self) -> &PostView {
        &self.view
    }

    pub fn fetcher(&self) -> &ContentFetcher<T> {
        &self.fetcher
    }

    /// Navigate to `path`, fetching and rendering its body when it resolves
    pub async fn navigate(&mut self, path: Option<&str>) -> Navigation {
        let navigation = self.view.navigate(path);
        if let Navigation::Fetch(post, ticket) = &navigation {
            let result = self.fetcher.fetch(post).await;
            self.view.complete(*ticket, result, &self.renderer);
        }
        navigation
    }

    /// Attach the current HTML to `surface`, then fire the post-render hook
    pub fn commit<H: RenderHook + ?Sized>(&self, surface: &mut Surface, hook: &H) {
        surface.attach(self.view.current().html().to_string());
        hook.after_render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SyntectHighlighter;
    use crate::fetch::MemoryTransport;
    use crate::view::HighlightHook;
    use std::cell::Cell;

    const MANIFEST: &str =
        r#"[{"title":"A","path":"a","date":"2020","enabled":true,"isExternal":false}]"#;

    fn transport() -> MemoryTransport {
        MemoryTransport::new()
            .with("/posts.json", MANIFEST)
            .with("/posts/a.md", "# A\n\n```rust\nfn a() {}\n```\n")
    }

    struct CountingHook {
        calls: Cell<u32>,
        saw: Cell<u64>,
    }

    impl RenderHook for CountingHook {
        fn after_render(&self, surface: &mut Surface) {
            self.calls.set(self.calls.get() + 1);
            self.saw.set(surface.renders());
        }
    }

    #[tokio::test]
    async fn test_scenario_listing_then_post() {
        let mut pipeline = Pipeline::start(transport(), &SiteConfig::default()).await;

        let listing = pipeline.view().index().listing();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].title, "A");

        assert!(matches!(pipeline.navigate(Some("a")).await, Navigation::Fetch(..)));
        assert_eq!(
            pipeline.fetcher().transport().requests(),
            vec!["/posts.json", "/posts/a.md"]
        );
        assert!(pipeline.view().current().html().contains("<h1>A</h1>"));
    }

    #[tokio::test]
    async fn test_scenario_missing_post_redirects_without_fetch() {
        let mut pipeline = Pipeline::start(transport(), &SiteConfig::default()).await;
        pipeline.navigate(Some("a")).await;

        assert_eq!(pipeline.navigate(Some("missing-post")).await, Navigation::Redirect);
        assert!(pipeline.view().current().html().is_empty());
        assert!(!pipeline
            .fetcher()
            .transport()
            .requests()
            .contains(&"/posts/missing-post.md".to_string()));
    }

    #[tokio::test]
    async fn test_external_post_makes_no_content_request() {
        let manifest = r#"[{"title":"Remote","path":"https://example.com/post","date":"2021","enabled":true,"isExternal":true}]"#;
        let transport = MemoryTransport::new().with("/posts.json", manifest);
        let mut pipeline = Pipeline::start(transport, &SiteConfig::default()).await;

        match pipeline.navigate(Some("https://example.com/post")).await {
            Navigation::External(post) => {
                assert_eq!(post.external_url(), Some("https://example.com/post"))
            }
            other => panic!("unexpected navigation: {:?}", other),
        }
        assert_eq!(pipeline.fetcher().transport().requests(), vec!["/posts.json"]);
        assert!(pipeline.view().current().html().is_empty());
    }

    #[tokio::test]
    async fn test_manifest_failure_gives_empty_listing() {
        let mut pipeline = Pipeline::start(MemoryTransport::new(), &SiteConfig::default()).await;
        assert!(pipeline.view().index().listing().is_empty());
        assert_eq!(pipeline.navigate(Some("a")).await, Navigation::Redirect);
    }

    #[tokio::test]
    async fn test_missing_body_leaves_empty_post_view() {
        let transport = MemoryTransport::new().with("/posts.json", MANIFEST);
        let mut pipeline = Pipeline::start(transport, &SiteConfig::default()).await;

        pipeline.navigate(Some("a")).await;
        let current = pipeline.view().current();
        assert!(current.failed());
        assert!(current.html().is_empty());
    }

    #[tokio::test]
    async fn test_hook_fires_after_every_attach() {
        let mut pipeline = Pipeline::start(transport(), &SiteConfig::default()).await;
        let hook = CountingHook {
            calls: Cell::new(0),
            saw: Cell::new(0),
        };
        let mut surface = Surface::new();

        pipeline.navigate(Some("a")).await;
        pipeline.commit(&mut surface, &hook);
        pipeline.navigate(None).await;
        pipeline.commit(&mut surface, &hook);
        pipeline.navigate(Some("a")).await;
        pipeline.commit(&mut surface, &hook);

        assert_eq!(hook.calls.get(), 3);
        assert_eq!(hook.saw.get(), 3);
    }

    #[tokio::test]
    async fn test_commit_highlights_new_content() {
        let mut pipeline = Pipeline::start(transport(), &SiteConfig::default()).await;
        let highlighter = SyntectHighlighter::new();
        let hook = HighlightHook::new(&highlighter);
        let mut surface = Surface::new();

        pipeline.navigate(Some("a")).await;
        pipeline.commit(&mut surface, &hook);

        assert!(surface.is_revealed());
        assert!(surface.html().contains("highlight rust"));
        assert!(!surface.html().contains("<pre><code"));
    }
}
