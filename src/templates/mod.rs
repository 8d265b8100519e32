//! Page templates for the listing and single posts

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{
    anchor, edit_url, html_escape, link_to, post_permalink, post_url, share_url, url_for,
};
use crate::view::{Surface, ZoomPopup};

const STYLE: &str = r#"<style>
:root { --bg: #ffffff; --fg: #1f2328; --muted: #656d76; --link: #0969da; }
[data-theme="dark"] { --bg: #0d1117; --fg: #e6edf3; --muted: #8d96a0; --link: #4493f8; }
body { background: var(--bg); color: var(--fg); font-family: system-ui, sans-serif; max-width: 46rem; margin: 0 auto; padding: 1rem; }
a { color: var(--link); }
header { display: flex; justify-content: space-between; align-items: center; }
.date, .post-links { color: var(--muted); font-size: 0.9rem; }
#markdown { display: none; }
#markdown.loaded { display: block; animation: fadeIn 1s; }
figure.highlight { margin: 1rem 0; overflow-x: auto; }
figure.highlight pre { padding: 0.75rem; }
.post-nav { display: flex; justify-content: space-between; }
#image-zoom { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.8); text-align: center; }
#image-zoom img { max-width: 100%; max-height: 90vh; }
@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
</style>"#;

/// Renders complete HTML pages around the display surface
pub struct PageRenderer<'a> {
    config: &'a SiteConfig,
}

impl<'a> PageRenderer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// The newest-first post listing
    pub fn listing(&self, posts: &[&Post], surface: &Surface) -> String {
        let mut body = String::from("<ul class=\"posts\">\n");
        for post in posts {
            body.push_str(&format!(
                "<li>{} <span class=\"date\">{}</span></li>\n",
                self.post_link(post),
                html_escape(&post.date)
            ));
        }
        body.push_str("</ul>\n");

        if posts.is_empty() {
            body = "<p class=\"empty\">No posts yet.</p>\n".to_string();
        }

        self.layout(&self.config.title, surface, &body)
    }

    /// A single post; its body is whatever the surface currently shows
    ///
    /// `listing` is the newest-first listing the newer/older links walk.
    pub fn post(&self, post: &Post, listing: &[&Post], surface: &Surface, failed: bool) -> String {
        let page_url = post_permalink(self.config, post);

        let mut links = Vec::new();
        if let Some(url) = edit_url(self.config, post) {
            links.push(link_to(self.config, &url, "Edit this post", true));
        }
        if let Some(url) = share_url(self.config, post, &page_url) {
            links.push(link_to(self.config, &url, "Share", true));
        }

        let content = if failed {
            "<p class=\"error\">This post could not be loaded.</p>".to_string()
        } else {
            surface.html().to_string()
        };

        let body = format!(
            r#"<article>
<h1>{title}</h1>
<p class="date">{date}</p>
<div id="markdown"{loaded}>
{content}
</div>
<p class="post-links">{links}</p>
{nav}{zoom}</article>
"#,
            title = html_escape(&post.title),
            date = html_escape(&post.date),
            loaded = if surface.is_revealed() { r#" class="loaded""# } else { "" },
            content = content,
            links = links.join(" · "),
            nav = self.post_nav(post, listing),
            zoom = zoom_popup(&ZoomPopup::default()),
        );

        let title = format!("{} - {}", post.title, self.config.title);
        self.layout(&title, surface, &body)
    }

    /// Title linked to the post, or plain text when there is nowhere to go
    fn post_link(&self, post: &Post) -> String {
        if post.is_linkable() {
            anchor(&post_url(self.config, post), &post.title, post.is_external)
        } else {
            format!("<span class=\"title\">{}</span>", html_escape(&post.title))
        }
    }

    fn post_nav(&self, post: &Post, listing: &[&Post]) -> String {
        let newer = post.prev(listing).filter(|p| p.is_linkable());
        let older = post.next(listing).filter(|p| p.is_linkable());
        if newer.is_none() && older.is_none() {
            return String::new();
        }

        let side = |rel: &str, label: &str, target: Option<&Post>| match target {
            Some(p) => format!(
                "<span class=\"{}\">{} {}</span>",
                rel,
                label,
                self.post_link(p)
            ),
            None => format!("<span class=\"{}\"></span>", rel),
        };
        format!(
            "<nav class=\"post-nav\">{}{}</nav>\n",
            side("newer", "Newer:", newer),
            side("older", "Older:", older)
        )
    }

    fn layout(&self, title: &str, surface: &Surface, body: &str) -> String {
        let attributes: String = surface
            .attributes()
            .map(|(name, value)| format!(r#" {}="{}""#, name, html_escape(value)))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en"{attributes}>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
{style}
</head>
<body>
<header>
<a class="site-title" href="{home}">{site}</a>
<a class="theme-toggle" href="{toggle}">Toggle theme</a>
</header>
<main>
{body}</main>
</body>
</html>
"#,
            attributes = attributes,
            title = html_escape(title),
            description = html_escape(&self.config.description),
            style = STYLE,
            home = url_for(self.config, "/"),
            site = html_escape(&self.config.title),
            toggle = url_for(self.config, "/theme/toggle"),
            body = body,
        )
    }
}

/// Markup of the image zoom popup in the given state
fn zoom_popup(popup: &ZoomPopup) -> String {
    format!(
        r#"<div id="image-zoom"{hidden}><img src="{src}" alt=""><a href="{href}" target="_blank" rel="noopener"{link_hidden}>Open full size</a></div>
"#,
        hidden = if popup.visible { "" } else { " hidden" },
        src = html_escape(&popup.image_src),
        href = html_escape(&popup.link_href),
        link_hidden = if popup.link_visible { "" } else { " hidden" },
    )
}
