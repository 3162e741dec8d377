//! Workspace data model, layer stack operations and the JSON document.

mod document;
/// Background and layer descriptors.
pub mod model;
/// The workspace aggregate and its layer operations.
pub mod workspace;
