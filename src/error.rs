//! Error types shared by the post pipeline and the theme stores

use thiserror::Error;

/// Failure to retrieve the manifest or a post body
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("post '{path}' is external and has no local body")]
    External { path: String },
}

impl FetchError {
    pub fn not_found(url: &str) -> Self {
        FetchError::Status {
            url: url.to_string(),
            status: 404,
        }
    }

    /// HTTP-style status, when the failure carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure to persist a theme preference
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
