use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{ThumbError, ThumbResult},
    scene::workspace::{WORKSPACE_VERSION, Workspace},
};

impl Workspace {
    /// Parse and validate a workspace JSON document.
    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let ws: Workspace =
            serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("workspace json: {e}")))?;
        if ws.version() > WORKSPACE_VERSION {
            return Err(ThumbError::serde(format!(
                "workspace version {} is newer than supported version {WORKSPACE_VERSION}",
                ws.version()
            )));
        }
        ws.validate()?;
        Ok(ws)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> ThumbResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ThumbError::serde(e.to_string()))
    }

    /// Read and validate a workspace document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read workspace {}", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Write the workspace as JSON, creating parent directories as needed.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> ThumbResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ThumbError::io(format!("create {}: {e}", parent.display())))?;
        }
        let s = self.to_json_string()?;
        std::fs::write(path, s).map_err(|e| ThumbError::io(format!("write {}: {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
