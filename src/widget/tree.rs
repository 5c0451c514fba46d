//! Widget tree for scene visuals.
//!
//! A flat arena of widgets linked by parent/child relations. The scene model
//! never renders anything itself; it only asks the tree to create widgets
//! through its visual hooks and to detach them again on removal.

use std::fmt;

/// Opaque handle to a widget stored in a [`WidgetTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    /// Returns the arena index behind this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a widget stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// A container for other widgets.
    Layer,
    /// Visual for a node.
    Node,
    /// Visual for a pin.
    Pin,
    /// Visual for an edge, drawn between its two anchors.
    Connection,
}

impl WidgetKind {
    /// Returns a human-readable name for the widget kind.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Layer => "Layer",
            WidgetKind::Node => "Node",
            WidgetKind::Pin => "Pin",
            WidgetKind::Connection => "Connection",
        }
    }
}

/// A single widget in the tree.
#[derive(Clone, Debug)]
pub struct Widget {
    /// What this widget represents.
    pub kind: WidgetKind,
    /// Display text.
    pub label: String,
    /// Position relative to the canvas origin.
    pub position: (f32, f32),
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    /// Widget the connection starts at (connections only).
    pub source_anchor: Option<WidgetId>,
    /// Widget the connection ends at (connections only).
    pub target_anchor: Option<WidgetId>,
}

impl Widget {
    fn new(kind: WidgetKind, label: String) -> Self {
        Self {
            kind,
            label,
            position: (0.0, 0.0),
            parent: None,
            children: Vec::new(),
            source_anchor: None,
            target_anchor: None,
        }
    }

    /// Returns the parent widget, if attached.
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Returns the child widgets in insertion order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }
}

/// Arena holding every widget created for a scene.
///
/// Widgets are never freed: detaching a widget orphans it, which is what the
/// scene model relies on when an entity is removed. Handles therefore stay
/// valid for the tree's whole life; drop the tree to reclaim the memory.
#[derive(Clone, Debug, Default)]
pub struct WidgetTree {
    widgets: Vec<Widget>,
}

impl WidgetTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached widget and returns its handle.
    pub fn create(&mut self, kind: WidgetKind, label: impl Into<String>) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        self.widgets.push(Widget::new(kind, label.into()));
        id
    }

    /// Returns the number of widgets ever created.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if no widget was created yet.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Returns a widget by handle.
    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    /// Returns a mutable widget by handle.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    /// Returns the parent of a widget.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.get(id).and_then(|w| w.parent)
    }

    /// Returns the children of a widget, empty for unknown handles.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.get(id).map(|w| w.children.as_slice()).unwrap_or(&[])
    }

    /// Returns every widget without a parent.
    pub fn roots(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.parent.is_none())
            .map(|(i, _)| WidgetId(i))
    }

    /// Attaches `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns false if either handle is unknown or the two are the same widget.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        self.remove_from_parent(child);
        self.widgets[child.0].parent = Some(parent);
        self.widgets[parent.0].children.push(child);
        true
    }

    /// Detaches a widget from its parent. Does nothing for root widgets.
    pub fn remove_from_parent(&mut self, id: WidgetId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.widgets[parent.0].children.retain(|&c| c != id);
        self.widgets[id.0].parent = None;
    }

    /// Returns true if `id` is attached, directly or transitively, under `ancestor`.
    pub fn is_descendant_of(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Sets the source anchor of a connection widget.
    pub fn set_source_anchor(&mut self, connection: WidgetId, anchor: Option<WidgetId>) {
        if let Some(w) = self.get_mut(connection) {
            w.source_anchor = anchor;
        }
    }

    /// Sets the target anchor of a connection widget.
    pub fn set_target_anchor(&mut self, connection: WidgetId, anchor: Option<WidgetId>) {
        if let Some(w) = self.get_mut(connection) {
            w.target_anchor = anchor;
        }
    }

    /// Returns the absolute position of a widget (sum of positions up to the root).
    pub fn absolute_position(&self, id: WidgetId) -> (f32, f32) {
        let mut pos = (0.0, 0.0);
        let mut current = Some(id);
        while let Some(w) = current.and_then(|c| self.get(c)) {
            pos.0 += w.position.0;
            pos.1 += w.position.1;
            current = w.parent;
        }
        pos
    }
}
