//! Widget module
//!
//! The visual tree scene entities are mapped onto.

mod tree;

pub use tree::{Widget, WidgetId, WidgetKind, WidgetTree};
