//! Post index: the manifest loaded once per session, newest first

use std::collections::HashSet;

use super::Post;
use crate::error::FetchError;
use crate::fetch::Transport;

/// Outcome of looking up a navigated path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// No path was given; show the listing
    Listing,
    /// Exactly one record carries the path
    Found(&'a Post),
    /// A path was given but nothing matches it
    NotFound,
}

/// Immutable, ordered set of post records
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    include_disabled: bool,
}

impl PostIndex {
    /// Build an index from records in manifest order
    pub fn new(mut manifest: Vec<Post>) -> Self {
        manifest.reverse();

        let mut seen = HashSet::new();
        for post in &manifest {
            if !seen.insert(post.path.as_str()) {
                tracing::warn!("Duplicate post path '{}' in manifest", post.path);
            }
        }

        Self {
            posts: manifest,
            include_disabled: false,
        }
    }

    /// Parse a manifest document; `null` and `[]` both give an empty index
    pub fn from_json(url: &str, json: &str) -> Result<Self, FetchError> {
        let posts: Option<Vec<Post>> =
            serde_json::from_str(json).map_err(|source| FetchError::Parse {
                url: url.to_string(),
                source,
            })?;
        Ok(Self::new(posts.unwrap_or_default()))
    }

    /// Fetch and parse the manifest at `url`
    pub async fn load<T: Transport>(transport: &T, url: &str) -> Result<Self, FetchError> {
        let json = transport.get_string(url).await?;
        let index = Self::from_json(url, &json)?;
        tracing::debug!("Loaded {} posts from {}", index.posts.len(), url);
        Ok(index)
    }

    /// Like [`PostIndex::load`], degrading to an empty index on failure
    pub async fn load_or_empty<T: Transport>(transport: &T, url: &str) -> Self {
        match Self::load(transport, url).await {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Failed to load post index: {}", e);
                Self::default()
            }
        }
    }

    /// Also list and resolve records whose `enabled` flag is off
    pub fn include_disabled(mut self, include: bool) -> Self {
        self.include_disabled = include;
        self
    }

    /// Every record, newest first, regardless of `enabled`
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Records eligible for display, newest first
    pub fn listing(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| self.is_visible(p)).collect()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Exact, case-sensitive lookup of a navigated path
    pub fn resolve(&self, path: Option<&str>) -> Resolution<'_> {
        let path = match path {
            Some(path) if !path.is_empty() => path,
            _ => return Resolution::Listing,
        };

        match self
            .posts
            .iter()
            .find(|p| p.path == path && self.is_visible(p))
        {
            Some(post) => Resolution::Found(post),
            None => Resolution::NotFound,
        }
    }

    fn is_visible(&self, post: &Post) -> bool {
        post.enabled || self.include_disabled
    }
}
