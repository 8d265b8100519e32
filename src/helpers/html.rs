//! HTML helper functions

use super::url::url_for;
use crate::config::SiteConfig;

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to(&config, "/about/", "About", false) // -> <a href="/blog/about/">About</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str, external: bool) -> String {
    let absolute = path.starts_with("http://") || path.starts_with("https://");
    let href = if absolute {
        path.to_string()
    } else {
        url_for(config, path)
    };
    anchor(&href, text, external || absolute)
}

/// Generate an anchor tag for an already-built href
pub fn anchor(href: &str, text: &str, new_tab: bool) -> String {
    if new_tab {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(href),
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), html_escape(text))
    }
}

/// Escape text for HTML bodies and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_link_to() {
        let config = test_config();
        assert_eq!(link_to(&config, "/about/", "About", false), r#"<a href="/blog/about/">About</a>"#);
        assert_eq!(
            link_to(&config, "https://x.dev", "X", false),
            r#"<a href="https://x.dev" target="_blank" rel="noopener">X</a>"#
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
