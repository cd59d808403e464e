//! Resolve stored CDN references to local files or download URLs

use std::path::{Path, PathBuf};

/// Remove every occurrence of `prefix` and any leading slashes
fn strip_cdn_prefix(path: &str, prefix: &str) -> String {
    let stripped = if prefix.is_empty() {
        path.to_string()
    } else {
        path.replace(prefix, "")
    };
    stripped.trim_start_matches('/').to_string()
}

/// Resolves CDN paths against a pre-downloaded local tree
#[derive(Debug, Clone)]
pub struct LocalResolver {
    input_root: PathBuf,
    cdn_prefix: String,
}

impl LocalResolver {
    pub fn new(input_root: impl Into<PathBuf>, cdn_prefix: impl Into<String>) -> Self {
        Self {
            input_root: input_root.into(),
            cdn_prefix: cdn_prefix.into(),
        }
    }

    /// Local path a CDN reference maps to, whether or not it exists
    #[must_use]
    pub fn local_path(&self, cdn_path: &str) -> PathBuf {
        self.input_root
            .join(strip_cdn_prefix(cdn_path, &self.cdn_prefix))
    }

    /// Existing local file for a CDN reference, `None` if absent
    #[must_use]
    pub fn resolve(&self, cdn_path: &str) -> Option<PathBuf> {
        if cdn_path.is_empty() {
            return None;
        }

        let path = self.local_path(cdn_path);
        path.is_file().then_some(path)
    }
}

/// A remote asset and where it is cached locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    pub url: String,
    pub cache_path: PathBuf,
    /// The cache file already exists
    pub cached: bool,
}

/// Resolves CDN paths to download URLs and cache locations
#[derive(Debug, Clone)]
pub struct RemoteResolver {
    cdn_base_url: String,
}

impl RemoteResolver {
    pub fn new(cdn_base_url: impl Into<String>) -> Self {
        Self {
            cdn_base_url: cdn_base_url.into(),
        }
    }

    /// Absolute download URL for a stored CDN reference.
    ///
    /// A protocol-relative base (`//cdn.example.com`) is fetched over `http:`.
    #[must_use]
    pub fn download_url(&self, cdn_path: &str) -> String {
        let relative = strip_cdn_prefix(cdn_path, &self.cdn_base_url);
        let base = self.cdn_base_url.trim_end_matches('/');

        if base.starts_with("//") {
            format!("http:{base}/{relative}")
        } else {
            format!("{base}/{relative}")
        }
    }

    /// Resolve a stored reference into a product cache directory.
    ///
    /// Returns `None` for an empty reference or a URL without a final path
    /// segment.
    #[must_use]
    pub fn resolve(&self, cdn_path: &str, product_dir: &Path) -> Option<RemoteAsset> {
        if cdn_path.is_empty() {
            return None;
        }

        let url = self.download_url(cdn_path);
        let filename = url.rsplit('/').next().filter(|name| !name.is_empty())?;
        let cache_path = product_dir.join(filename);
        let cached = cache_path.is_file();

        Some(RemoteAsset {
            url,
            cache_path,
            cached,
        })
    }
}
