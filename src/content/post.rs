//! Post metadata record

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the post manifest
///
/// Missing fields and explicit `null`s both fall back to the field's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Post title
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Unique slug, used both in URLs and to locate the markdown body
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,

    /// Display date, kept as written in the manifest
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,

    /// Whether the post may be listed and served
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,

    /// Body lives outside this site
    #[serde(rename = "isExternal", deserialize_with = "null_as_default")]
    pub is_external: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Post {
    /// Create an enabled, local post
    pub fn new(title: &str, path: &str, date: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
            date: date.to_string(),
            enabled: true,
            is_external: false,
        }
    }

    /// Absolute target of an external post, if its path is one
    pub fn external_url(&self) -> Option<&str> {
        if !self.is_external {
            return None;
        }
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            Some(&self.path)
        } else {
            None
        }
    }

    /// Whether the listing can link to this post
    pub fn is_linkable(&self) -> bool {
        !self.is_external || self.external_url().is_some()
    }

    /// Get the previous (newer) post in a newest-first listing
    pub fn prev<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.path == self.path)?;
        if pos > 0 {
            Some(posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a newest-first listing
    pub fn next<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.path == self.path)?;
        posts.get(pos + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_field_names() {
        let json = r#"{"title":"A","path":"a","date":"2020","enabled":true,"isExternal":false}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new("A", "a", "2020"));

        let out = serde_json::to_string(&post).unwrap();
        assert!(out.contains(r#""isExternal":false"#));
    }

    #[test]
    fn test_missing_fields_default() {
        let post: Post = serde_json::from_str(r#"{"path":"x"}"#).unwrap();
        assert_eq!(post.path, "x");
        assert!(post.title.is_empty());
        assert!(!post.enabled);
        assert!(!post.is_external);
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{"title":"A","path":"a","date":null,"enabled":true,"isExternal":null}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new("A", "a", ""));
    }

    #[test]
    fn test_is_linkable() {
        let mut post = Post::new("Out", "elsewhere", "2021");
        assert!(post.is_linkable());

        post.is_external = true;
        assert!(!post.is_linkable());

        post.path = "https://example.com/post".to_string();
        assert!(post.is_linkable());
    }

    #[test]
    fn test_external_url() {
        let mut post = Post::new("Elsewhere", "https://example.com/post", "2021");
        assert_eq!(post.external_url(), None);

        post.is_external = true;
        assert_eq!(post.external_url(), Some("https://example.com/post"));

        post.path = "not-a-url".to_string();
        assert_eq!(post.external_url(), None);
    }

    #[test]
    fn test_prev_next() {
        let (c, b, a) = (
            Post::new("C", "c", "2022"),
            Post::new("B", "b", "2021"),
            Post::new("A", "a", "2020"),
        );
        let posts = vec![&c, &b, &a];
        assert_eq!(posts[1].prev(&posts).map(|p| p.path.as_str()), Some("c"));
        assert_eq!(posts[1].next(&posts).map(|p| p.path.as_str()), Some("a"));
        assert!(posts[0].prev(&posts).is_none());
        assert!(posts[2].next(&posts).is_none());
    }
}
