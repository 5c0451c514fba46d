//! Scene module
//!
//! Graph scene models: [`GraphScene`] (nodes and edges) and
//! [`GraphPinScene`] (nodes owning pins, edges between pins), the hook
//! traits they call into, and the object/widget association they keep.

mod error;
mod graph;
mod hooks;
mod incidence;
mod layered;
mod objects;
mod pin_graph;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SceneError;
pub use graph::GraphScene;
pub use hooks::{GraphVisuals, NoVisuals, PinVisuals, VisualContext};
pub use incidence::{Endpoints, Links};
pub use layered::{LayeredVisuals, NODE_HEADER_HEIGHT, NODE_WIDTH, PIN_SPACING};
pub use objects::{ObjectMap, SceneKey, SceneObject};
pub use pin_graph::GraphPinScene;
