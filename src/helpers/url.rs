//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::Post;

/// Characters escaped in a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/hello-world") // -> "https://example.com/blog/hello-world"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Site-relative URL of a post page
pub fn post_url(config: &SiteConfig, post: &Post) -> String {
    match post.external_url() {
        Some(url) => url.to_string(),
        None => url_for(config, &encode_path_segment(&post.path)),
    }
}

/// Absolute URL of a post page
pub fn post_permalink(config: &SiteConfig, post: &Post) -> String {
    match post.external_url() {
        Some(url) => url.to_string(),
        None => full_url_for(config, &encode_path_segment(&post.path)),
    }
}

/// Link to the post's source in the repository, from the `edit_url` template
pub fn edit_url(config: &SiteConfig, post: &Post) -> Option<String> {
    if config.edit_url.is_empty() || post.is_external {
        return None;
    }
    Some(
        config
            .edit_url
            .replace("{path}", &encode_path_segment(&post.path)),
    )
}

/// Share link for a post, from the `share_url` template
pub fn share_url(config: &SiteConfig, post: &Post, page_url: &str) -> Option<String> {
    if config.share_url.is_empty() {
        return None;
    }
    Some(
        config
            .share_url
            .replace("{title}", &encode_url(&post.title))
            .replace("{url}", &encode_url(page_url)),
    )
}

/// Encode a value for use inside a query string
pub fn encode_url(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Encode a value for use as one path segment
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}
