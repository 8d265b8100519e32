//! Local server hosting the blog, with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{
        header::{COOKIE, REFERER, SET_COOKIE, VARY},
        HeaderMap, HeaderName, HeaderValue, Request, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};
use tower_http::services::ServeDir;

use crate::content::{Highlighter, MarkdownRenderer, PostIndex, Resolution};
use crate::helpers::url_for;
use crate::templates::PageRenderer;
use crate::theme::{CookieThemeStore, Theme, ThemeController};
use crate::view::{HighlightHook, Navigation, Pipeline, Surface};
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

const ACCEPT_CH: HeaderName = HeaderName::from_static("accept-ch");
const PREFERS_COLOR_SCHEME: HeaderName = HeaderName::from_static("sec-ch-prefers-color-scheme");

/// Server state
pub struct ServerState {
    blog: Blog,
    index: RwLock<Arc<PostIndex>>,
    renderer: MarkdownRenderer,
    highlighter: Box<dyn Highlighter + Send + Sync>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    /// Load the post index and prepare the renderers
    pub async fn new(blog: Blog, live_reload: bool) -> Arc<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        let index = load_index(&blog).await;

        Arc::new(Self {
            renderer: MarkdownRenderer::with_options(&blog.config.markdown),
            highlighter: blog.highlighter(),
            index: RwLock::new(Arc::new(index)),
            blog,
            reload_tx,
            live_reload,
        })
    }
}

async fn load_index(blog: &Blog) -> PostIndex {
    PostIndex::load_or_empty(&blog.transport(), &blog.config.manifest_url())
        .await
        .include_disabled(blog.config.render_disabled)
}

/// Routes of the blog
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/theme/toggle", get(toggle_theme_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let state = ServerState::new(blog.clone(), watch).await;
    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(state).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the site directory; every change starts a new session
async fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    let site_dir = state.blog.site_dir.clone();
    if site_dir.exists() {
        debouncer
            .watcher()
            .watch(&site_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", site_dir);
    }

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                let index = load_index(&state.blog).await;
                tracing::info!("Site changed, reloaded {} posts", index.len());
                *state.index.write().await = Arc::new(index);
                let _ = state.reload_tx.send(());
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Flip the theme cookie and go back where the user came from
async fn toggle_theme_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    let config = &state.blog.config;
    let mut surface = Surface::new();
    let mut controller = ThemeController::load(
        cookie_store(&headers, &config.theme.storage_key),
        ambient_theme(&headers),
        &config.theme.attribute,
        &mut surface,
    );

    if let Err(e) = controller.toggle(&mut surface) {
        tracing::warn!("Failed to toggle theme: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
    }
    tracing::debug!("Theme toggled to {}", controller.theme());

    let back = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(referer_path)
        .unwrap_or_else(|| url_for(config, "/"));

    let mut response = Redirect::to(&back).into_response();
    if let Some(cookie) = controller.store().set_cookie() {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

/// Fallback handler: the listing, single posts, then static files
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let root = state.blog.config.root.trim_end_matches('/');
    let path = request.uri().path().to_string();
    let headers = request.headers().clone();
    let relative = path.strip_prefix(root).unwrap_or(&path);
    let segment = relative.trim_start_matches('/');

    if segment.is_empty() {
        return show(&state, None, &headers).await;
    }

    // manifest slugs win over static files, even with a dot or slash in them
    let decoded = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    let is_post = matches!(
        state.index.read().await.resolve(Some(&decoded)),
        Resolution::Found(_)
    );
    if is_post || !(segment.contains('/') || segment.contains('.')) {
        return show(&state, Some(&decoded), &headers).await;
    }

    let mut service = ServeDir::new(&state.blog.site_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Run one navigation through the pipeline and render the resulting page
async fn show(state: &ServerState, path: Option<&str>, headers: &HeaderMap) -> Response {
    let config = &state.blog.config;
    let index = state.index.read().await.clone();
    let mut pipeline = Pipeline::new(
        state.blog.transport(),
        state.renderer.clone(),
        index,
        &config.posts_dir,
    );

    // applies the theme attribute to the surface
    let mut surface = Surface::new();
    ThemeController::load(
        cookie_store(headers, &config.theme.storage_key),
        ambient_theme(headers),
        &config.theme.attribute,
        &mut surface,
    );

    let pages = PageRenderer::new(config);
    match pipeline.navigate(path).await {
        Navigation::Listing => {
            let listing = pipeline.view().index().listing();
            page_response(state, pages.listing(&listing, &surface))
        }
        Navigation::Redirect => Redirect::to(&url_for(config, "/")).into_response(),
        Navigation::External(post) => {
            let target = post
                .external_url()
                .map(str::to_string)
                .unwrap_or_else(|| url_for(config, "/"));
            Redirect::to(&target).into_response()
        }
        Navigation::Fetch(post, _) => {
            pipeline.commit(&mut surface, &HighlightHook::new(state.highlighter.as_ref()));
            let failed = pipeline.view().current().failed();
            let listing = pipeline.view().index().listing();
            page_response(state, pages.post(&post, &listing, &surface, failed))
        }
    }
}

fn page_response(state: &ServerState, html: String) -> Response {
    let html = if state.live_reload {
        inject_live_reload(&html)
    } else {
        html
    };

    let mut response = Html(html).into_response();
    let headers = response.headers_mut();
    headers.insert(ACCEPT_CH, HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"));
    headers.insert(VARY, HeaderValue::from_static("Cookie, Sec-CH-Prefers-Color-Scheme"));
    response
}

fn cookie_store(headers: &HeaderMap, key: &str) -> CookieThemeStore {
    let header = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    CookieThemeStore::from_header(header, key)
}

fn ambient_theme(headers: &HeaderMap) -> Theme {
    Theme::from_client_hint(headers.get(PREFERS_COLOR_SCHEME).and_then(|v| v.to_str().ok()))
}

/// Path and query of a referer, so redirects stay on this site
fn referer_path(referer: &str) -> Option<String> {
    let rest = referer.split_once("://").map_or(referer, |(_, rest)| rest);
    let start = if referer.starts_with('/') { 0 } else { rest.find('/')? };
    let path = &rest[start..];
    (!path.starts_with("//")).then(|| path.to_string())
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use axum::http::header::LOCATION;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn app(dir: &TempDir) -> Router {
        init_site(dir.path()).unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        router(ServerState::new(blog, false).await)
    }

    /// A scaffolded site whose manifest and post bodies are replaced
    async fn app_with(dir: &TempDir, manifest: &str, bodies: &[(&str, &str)]) -> Router {
        init_site(dir.path()).unwrap();
        let site = dir.path().join("wwwroot");
        std::fs::write(site.join("posts.json"), manifest).unwrap();
        for (path, body) in bodies {
            std::fs::write(site.join("posts").join(format!("{}.md", path)), body).unwrap();
        }
        let blog = Blog::new(dir.path()).unwrap();
        router(ServerState::new(blog, false).await)
    }

    async fn request_page(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_listing() {
        let dir = TempDir::new().unwrap();
        let response = request_page(app(&dir).await, "/", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(ACCEPT_CH));

        let body = body_text(response).await;
        assert!(body.contains(r#"<a href="/hello-world">Hello World</a>"#));
        assert!(body.contains(r#"data-theme="light""#));
    }

    #[tokio::test]
    async fn test_post_is_highlighted() {
        let dir = TempDir::new().unwrap();
        let response = request_page(app(&dir).await, "/hello-world", &[("cookie", "darkmode=true")]).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains(r#"data-theme="dark""#));
        assert!(body.contains(r#"<div id="markdown" class="loaded">"#));
        assert!(body.contains("highlight bash"));
    }

    #[tokio::test]
    async fn test_unknown_post_redirects_home() {
        let dir = TempDir::new().unwrap();
        let response = request_page(app(&dir).await, "/missing-post", &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_dotted_slug_is_a_post() {
        let dir = TempDir::new().unwrap();
        let manifest = r#"[{"title":"Moving to .NET 6","path":"net-6.0","date":"2021","enabled":true,"isExternal":false}]"#;
        let app = app_with(&dir, manifest, &[("net-6.0", "Upgraded *today*.")]).await;

        let response = request_page(app.clone(), "/", &[]).await;
        assert!(body_text(response).await.contains(r#"href="/net-6.0""#));

        let response = request_page(app.clone(), "/net-6.0", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<em>today</em>"));

        // unknown dotted paths are still static files
        let response = request_page(app, "/favicon.ico", &[]).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_external_post_redirects_to_its_url() {
        let dir = TempDir::new().unwrap();
        let manifest = r#"[
            {"title":"Local","path":"local","date":"2020","enabled":true,"isExternal":false},
            {"title":"Remote","path":"https://example.com/post","date":"2021","enabled":true,"isExternal":true}
        ]"#;
        let app = app_with(&dir, manifest, &[("local", "# Local")]).await;

        let response = request_page(app.clone(), "/https%3A%2F%2Fexample.com%2Fpost", &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://example.com/post"
        );

        let body = body_text(request_page(app, "/local", &[]).await).await;
        assert!(body.contains(r#"Newer: <a href="https://example.com/post" target="_blank" rel="noopener">Remote</a>"#));
    }

    #[tokio::test]
    async fn test_external_post_without_url_is_not_linked() {
        let dir = TempDir::new().unwrap();
        let manifest = r#"[{"title":"Elsewhere","path":"elsewhere","date":"2021","enabled":true,"isExternal":true}]"#;
        let app = app_with(&dir, manifest, &[]).await;

        let body = body_text(request_page(app, "/", &[]).await).await;
        assert!(body.contains("Elsewhere"));
        assert!(!body.contains(r#"href="/elsewhere""#));
    }

    #[tokio::test]
    async fn test_static_manifest() {
        let dir = TempDir::new().unwrap();
        let response = request_page(app(&dir).await, "/posts.json", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("hello-world"));
    }

    #[tokio::test]
    async fn test_toggle_theme_sets_cookie() {
        let dir = TempDir::new().unwrap();
        let response = request_page(
            app(&dir).await,
            "/theme/toggle",
            &[("cookie", "darkmode=true"), ("referer", "http://localhost:4000/hello-world")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/hello-world");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("darkmode=false;"));
    }

    #[tokio::test]
    async fn test_toggle_uses_ambient_signal() {
        let dir = TempDir::new().unwrap();
        let response = request_page(
            app(&dir).await,
            "/theme/toggle",
            &[("sec-ch-prefers-color-scheme", "\"dark\"")],
        )
        .await;

        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("darkmode=false;"));
    }

    #[test]
    fn test_referer_path() {
        assert_eq!(referer_path("http://localhost:4000/a?b=1").as_deref(), Some("/a?b=1"));
        assert_eq!(referer_path("/a").as_deref(), Some("/a"));
        assert_eq!(referer_path("http://localhost:4000").as_deref(), None);
        assert_eq!(referer_path("//evil.example/x").as_deref(), None);
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body>x</body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</html>"));
    }
}
