//! Syntax highlighting of rendered code blocks

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

lazy_static! {
    /// An unhighlighted `pre > code` block as emitted by the markdown renderer
    static ref CODE_BLOCK: Regex =
        Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#)
            .expect("code block pattern is valid");
}

/// Highlights every code block of an HTML fragment
pub trait Highlighter {
    fn highlight(&self, html: &str) -> String;
}

/// Leaves HTML untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, html: &str) -> String {
        html.to_string()
    }
}

/// syntect-backed highlighter
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    pub fn with_options(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            line_numbers: config.line_number,
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a single block of unescaped code
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.filter(|l| !l.is_empty()).unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme() else {
            return plain_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => add_line_numbers(&highlighted, code, lang),
            Ok(highlighted) => format!(r#"<figure class="highlight {}">{}</figure>"#, lang, highlighted),
            Err(e) => {
                tracing::warn!("Failed to highlight {} block: {}", lang, e);
                plain_block(code, lang)
            }
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, html: &str) -> String {
        CODE_BLOCK
            .replace_all(html, |caps: &Captures| {
                let lang = caps.get(1).map(|m| m.as_str());
                let code = html_unescape(&caps[2]);
                self.highlight_code(&code, lang)
            })
            .into_owned()
    }
}

/// Fallback markup that the block pattern does not match again
fn plain_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre class="plain"><code class="language-{}">{}</code></pre>"#,
        lang,
        crate::helpers::html_escape(code)
    )
}

/// Put a line-number gutter next to highlighted code
fn add_line_numbers(highlighted: &str, code: &str, lang: &str) -> String {
    let line_count = code.lines().count().max(1);

    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, highlighted
    )
}

/// Undo the renderer's escaping of code text
fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlights_code_blocks() {
        let highlighter = SyntectHighlighter::new();
        let html = "<p>x</p>\n<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n";
        let out = highlighter.highlight(html);
        assert!(out.contains("<p>x</p>"));
        assert!(out.contains(r#"<figure class="highlight rust">"#));
        assert!(!out.contains("<pre><code"));
    }

    #[test]
    fn test_plain_block_without_language() {
        let highlighter = SyntectHighlighter::new();
        let out = highlighter.highlight("<pre><code>a &lt; b\n</code></pre>");
        assert!(out.contains(r#"<figure class="highlight text">"#));
        assert!(out.contains("&lt;"));
    }

    #[test]
    fn test_highlighting_twice_is_noop() {
        let highlighter = SyntectHighlighter::new();
        let once = highlighter.highlight("<pre><code class=\"language-js\">let a = 1;\n</code></pre>");
        assert_eq!(highlighter.highlight(&once), once);
    }

    #[test]
    fn test_line_numbers() {
        let config = HighlightConfig {
            line_number: true,
            ..HighlightConfig::default()
        };
        let highlighter = SyntectHighlighter::with_options(&config);
        let out = highlighter.highlight("<pre><code class=\"language-py\">a = 1\nb = 2\n</code></pre>");
        assert!(out.contains(r#"<span class="line-number">2</span>"#));
        assert!(!out.contains(r#"<span class="line-number">3</span>"#));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(html_unescape("a &amp;lt; b &lt; c"), "a &lt; b < c");
    }

    #[test]
    fn test_no_highlight() {
        assert_eq!(NoHighlight.highlight("<pre><code>x</code></pre>"), "<pre><code>x</code></pre>");
    }
}
