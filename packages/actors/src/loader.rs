//! Resource loading for jobs dispatched without inline content.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::future::BoxFuture;

/// Error raised when a job's resource cannot be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {uri}: {source}")]
pub struct LoadError {
    /// Resource identifier of the failed load.
    pub uri: String,
    #[source]
    pub source: std::io::Error,
}

/// Result type for resource loads.
pub type LoadResult = Result<String, LoadError>;

/// Reads the source and package bytes referenced by jobs.
pub trait ResourceLoader: Send + Sync + 'static {
    /// Read a source file as text.
    fn read_text(&self, uri: &str) -> BoxFuture<'static, LoadResult>;

    /// Read a binary resource and encode it as base64.
    fn read_binary_as_base64(&self, uri: &str) -> BoxFuture<'static, LoadResult>;
}

/// Loader that resolves resource identifiers against a filesystem root.
///
/// Identifiers may be plain paths or `file://` URIs; relative paths are
/// resolved against the root.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Create a loader rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ResourceLoader for FsLoader {
    fn read_text(&self, uri: &str) -> BoxFuture<'static, LoadResult> {
        let path = self.resolve(uri);
        let uri = uri.to_string();
        Box::pin(async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| LoadError { uri, source })
        })
    }

    fn read_binary_as_base64(&self, uri: &str) -> BoxFuture<'static, LoadResult> {
        let path = self.resolve(uri);
        let uri = uri.to_string();
        Box::pin(async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| LoadError { uri, source })?;
            Ok(BASE64.encode(bytes))
        })
    }
}
