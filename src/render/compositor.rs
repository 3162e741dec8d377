use crate::{
    foundation::error::{ThumbError, ThumbResult},
    render::{
        engine::{CanvasRender, Engine},
        scale::Resolution,
    },
    scene::workspace::Workspace,
};

/// Render lifecycle of a [`Compositor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompositorState {
    /// Cached buffer matches the last rendered snapshot.
    Clean,
    /// An edit happened since the last render.
    Dirty,
    /// A render is in flight.
    Rendering,
}

#[derive(Debug)]
struct Cached {
    fingerprint: u64,
    render: CanvasRender,
}

/// Keeps the last successful canvas render and decides when a new one is needed.
///
/// Failed renders leave the previous buffer in place as last-known-good.
#[derive(Debug)]
pub struct Compositor {
    state: CompositorState,
    last: Option<Cached>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable hash of a workspace snapshot at a resolution.
pub fn snapshot_fingerprint(workspace: &Workspace, resolution: Resolution) -> ThumbResult<u64> {
    let mut bytes = serde_json::to_vec(workspace).map_err(|e| ThumbError::serde(e.to_string()))?;
    bytes.push(match resolution {
        Resolution::Canonical => 0,
        Resolution::Preview => 1,
    });
    Ok(xxhash_rust::xxh3::xxh3_64(&bytes))
}

impl Compositor {
    /// Compositor with nothing rendered yet.
    pub fn new() -> Self {
        Self {
            state: CompositorState::Dirty,
            last: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Last successful render, if any.
    pub fn last_good(&self) -> Option<&CanvasRender> {
        self.last.as_ref().map(|c| &c.render)
    }

    /// Record that the workspace or one of its assets changed.
    pub fn mark_dirty(&mut self) {
        if self.state != CompositorState::Dirty {
            tracing::trace!(from = ?self.state, "compositor dirty");
        }
        self.state = CompositorState::Dirty;
    }

    /// Render `workspace` unless the cached buffer already shows this exact snapshot.
    ///
    /// On error the state returns to [`CompositorState::Clean`] and [`Self::last_good`] still
    /// holds the previous buffer.
    #[tracing::instrument(skip(self, engine, workspace))]
    pub fn render(
        &mut self,
        engine: &Engine,
        workspace: &Workspace,
        resolution: Resolution,
    ) -> ThumbResult<&CanvasRender> {
        let fingerprint = match snapshot_fingerprint(workspace, resolution) {
            Ok(fp) => fp,
            Err(e) => {
                self.state = CompositorState::Clean;
                return Err(e);
            }
        };
        let fresh = matches!(&self.last, Some(c) if c.fingerprint == fingerprint);
        if self.state == CompositorState::Clean && fresh {
            tracing::debug!(fingerprint, "compositor cache hit");
        } else {
            self.state = CompositorState::Rendering;
            let result = engine.render_canvas(workspace, resolution);
            self.state = CompositorState::Clean;
            match result {
                Ok(render) => {
                    self.last = Some(Cached {
                        fingerprint,
                        render,
                    });
                }
                Err(e) => {
                    tracing::debug!(error = %e, "render failed; keeping last good buffer");
                    return Err(e);
                }
            }
        }
        self.last
            .as_ref()
            .map(|c| &c.render)
            .ok_or_else(|| ThumbError::internal("compositor has no cached render"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
