use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::{
    assets::decode::{DecodedImage, load_image},
    foundation::error::{AssetLoadError, ThumbError, ThumbResult},
};

/// Session cache of decoded source images keyed by resolved path.
///
/// Entries are immutable once inserted and shared by `Arc`; a miss decodes the file fresh.
/// Failed loads are not cached, so fixing a file on disk is picked up by the next render.
/// Invalidation is caller-driven ([`ImageCache::invalidate`], [`ImageCache::clear`]).
#[derive(Debug, Default)]
pub struct ImageCache {
    root: Option<PathBuf>,
    entries: RwLock<HashMap<PathBuf, Arc<DecodedImage>>>,
}

impl ImageCache {
    /// Cache resolving relative paths against the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache resolving relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a descriptor path against the cache root. Absolute paths pass through.
    pub fn resolve(&self, source: &str) -> PathBuf {
        let p = Path::new(source);
        match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Return the decoded image for `source`, decoding it on a miss.
    pub fn get_or_load(&self, source: &str) -> Result<Arc<DecodedImage>, AssetLoadError> {
        let path = self.resolve(source);
        if source.trim().is_empty() {
            return Err(AssetLoadError::new(&path, "empty source path"));
        }
        if let Ok(entries) = self.entries.read()
            && let Some(hit) = entries.get(&path)
        {
            tracing::trace!(path = %path.display(), "image cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(path = %path.display(), "image cache miss, decoding");
        let decoded = Arc::new(load_image(&path)?);
        if let Ok(mut entries) = self.entries.write() {
            entries
                .entry(path)
                .or_insert_with(|| Arc::clone(&decoded));
        }
        Ok(decoded)
    }

    /// Drop the cached entry for `source`, if any.
    pub fn invalidate(&self, source: &str) -> ThumbResult<bool> {
        let path = self.resolve(source);
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ThumbError::internal("image cache lock poisoned"))?;
        Ok(entries.remove(&path).is_some())
    }

    /// Drop every cached entry.
    pub fn clear(&self) -> ThumbResult<()> {
        self.entries
            .write()
            .map_err(|_| ThumbError::internal("image cache lock poisoned"))?
            .clear();
        Ok(())
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no images.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
