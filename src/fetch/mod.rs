//! Retrieval of the manifest and post bodies
//!
//! The pipeline never touches the filesystem or network directly; it asks a
//! [`Transport`] for the text behind an origin-relative URL such as
//! `/posts.json` or `/posts/hello-world.md`.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::content::Post;
use crate::error::FetchError;

/// Source of text documents addressed by origin-relative URL
pub trait Transport {
    /// Fetch the document at `url`, failing on transport errors and non-success status
    fn get_string(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Serves documents out of a site directory on disk
#[derive(Debug, Clone)]
pub struct SiteTransport {
    root: PathBuf,
}

impl SiteTransport {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL onto a file below the root, refusing anything that escapes it
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(path.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

impl Transport for SiteTransport {
    async fn get_string(&self, url: &str) -> Result<String, FetchError> {
        let Some(file) = self.resolve(url) else {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 403,
            });
        };

        tracing::debug!("GET {} -> {:?}", url, file);
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::not_found(url)),
            Err(source) => Err(FetchError::Io {
                url: url.to_string(),
                source,
            }),
        }
    }
}

/// In-memory documents, recording every request it answers
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    documents: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: &str, body: &str) {
        self.documents.insert(url.to_string(), body.to_string());
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Transport for MemoryTransport {
    async fn get_string(&self, url: &str) -> Result<String, FetchError> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::not_found(url))
    }
}

/// Retrieves the markdown body of a resolved post
#[derive(Debug, Clone)]
pub struct ContentFetcher<T> {
    transport: T,
    posts_dir: String,
}

impl<T: Transport> ContentFetcher<T> {
    pub fn new(transport: T, posts_dir: &str) -> Self {
        Self {
            transport,
            posts_dir: posts_dir.trim_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Origin-relative URL of a post body
    pub fn content_url(&self, post: &Post) -> String {
        if self.posts_dir.is_empty() {
            format!("/{}.md", post.path)
        } else {
            format!("/{}/{}.md", self.posts_dir, post.path)
        }
    }

    /// Fetch the raw markdown of `post`; external posts are refused without a request
    pub async fn fetch(&self, post: &Post) -> Result<String, FetchError> {
        if post.is_external {
            return Err(FetchError::External {
                path: post.path.clone(),
            });
        }
        self.transport.get_string(&self.content_url(post)).await
    }
}
