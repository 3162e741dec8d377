use std::path::{Path, PathBuf};

/// Convenience result type used across thumbkit.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// A source asset (image or font) that could not be read or decoded.
///
/// Asset failures are isolated to the layer that referenced the asset, so this type is `Clone`
/// and gets recorded per layer in [`crate::RenderIssue`] instead of aborting the render.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("failed to load asset '{}': {reason}", path.display())]
pub struct AssetLoadError {
    /// Path as referenced by the descriptor (after resolving against the assets root).
    pub path: PathBuf,
    /// Human-readable cause.
    pub reason: String,
}

impl AssetLoadError {
    /// Build an [`AssetLoadError`] for `path`.
    pub fn new(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// Missing or corrupt image/font source.
    #[error("asset load error: {0}")]
    AssetLoad(#[from] AssetLoadError),

    /// Structurally invalid descriptor data (bad gradient, bad sizes, duplicate ids, ...).
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Unexpected numeric or geometry failure inside the engine.
    #[error("engine internal error: {0}")]
    Internal(String),

    /// Errors when serializing or deserializing workspace documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem errors while exporting or persisting.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::AssetLoad`] value.
    pub fn asset_load(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::AssetLoad(AssetLoadError::new(path, reason))
    }

    /// Build a [`ThumbError::InvalidSpec`] value.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    /// Build a [`ThumbError::Internal`] value.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Build a [`ThumbError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ThumbError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Whether this error aborts a whole render (as opposed to a per-layer asset failure).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AssetLoad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
