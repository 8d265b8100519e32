//! Markdown to HTML conversion

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::config::MarkdownConfig;

/// URL schemes never emitted into `href`/`src`
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Markdown renderer
///
/// Code blocks come out as plain `<pre><code class="language-*">` and are
/// left for the post-render highlighting pass.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    safe: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&MarkdownConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &MarkdownConfig) -> Self {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        if config.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }

        Self {
            options,
            safe: config.safe,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        if markdown.is_empty() {
            return String::new();
        }

        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);

        if self.safe {
            html::push_html(&mut html_output, parser.map(sanitize));
        } else {
            html::push_html(&mut html_output, parser);
        }

        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape raw HTML and neutralize script-capable link targets
fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lowered = url.trim_start().to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        tracing::debug!("Dropping unsafe link target {}", &*url);
        CowStr::Borrowed("")
    } else {
        url
    }
}
