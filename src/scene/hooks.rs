//! Visual hooks supplied to a scene at construction.
//!
//! A scene owns the graph bookkeeping; everything visual goes through one of
//! these traits. Implementations create widgets when entities are added,
//! re-anchor connection widgets when edge endpoints move, and (by default)
//! detach widgets from the tree when entities are removed.

use std::convert::Infallible;

use super::objects::{ObjectMap, SceneObject};
use crate::widget::{WidgetId, WidgetTree};

/// What a hook can see and touch while it runs.
pub struct VisualContext<'a, N, E, P = Infallible> {
    /// The widget tree, for creating and wiring widgets.
    pub widgets: &'a mut WidgetTree,
    /// Current object to widget associations.
    pub objects: &'a ObjectMap<SceneObject<N, E, P>>,
}

impl<'a, N, E, P> VisualContext<'a, N, E, P>
where
    N: Clone + Eq + std::hash::Hash,
    E: Clone + Eq + std::hash::Hash,
    P: Clone + Eq + std::hash::Hash,
{
    /// Returns the widget of a registered node.
    pub fn node_widget(&self, node: &N) -> Option<WidgetId> {
        self.objects.find_widget(&SceneObject::Node(node.clone()))
    }

    /// Returns the widget of a registered edge.
    pub fn edge_widget(&self, edge: &E) -> Option<WidgetId> {
        self.objects.find_widget(&SceneObject::Edge(edge.clone()))
    }

    /// Returns the widget of a registered pin.
    pub fn pin_widget(&self, pin: &P) -> Option<WidgetId> {
        self.objects.find_widget(&SceneObject::Pin(pin.clone()))
    }
}

/// Hooks for a [`GraphScene`](super::GraphScene).
///
/// Endpoint hooks receive nodes; `None` means "no endpoint".
pub trait GraphVisuals<N, E> {
    /// Creates the widget for a new node. `None` for non-visual nodes.
    fn attach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E>, node: &N) -> Option<WidgetId>;

    /// Creates the widget for a new edge. `None` for non-visual edges.
    fn attach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E>, edge: &E) -> Option<WidgetId>;

    /// Called after the source of `edge` moved from `old` to `new`.
    fn attach_edge_source_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        old: Option<&N>,
        new: Option<&N>,
    );

    /// Called after the target of `edge` moved from `old` to `new`.
    fn attach_edge_target_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        old: Option<&N>,
        new: Option<&N>,
    );

    /// Called after a node was unregistered.
    fn detach_node_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        _node: &N,
        widget: Option<WidgetId>,
    ) {
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    /// Called after an edge was unregistered.
    fn detach_edge_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        _edge: &E,
        widget: Option<WidgetId>,
    ) {
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    /// Called once a node is fully registered.
    fn notify_node_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        _node: &N,
        _widget: Option<WidgetId>,
    ) {
    }

    /// Called once an edge is fully registered.
    fn notify_edge_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        _edge: &E,
        _widget: Option<WidgetId>,
    ) {
    }
}

/// Hooks for a [`GraphPinScene`](super::GraphPinScene).
///
/// Same contract as [`GraphVisuals`], except that edge endpoints are pins and
/// pins get their own widgets.
pub trait PinVisuals<N, E, P> {
    fn attach_node_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        node: &N,
    ) -> Option<WidgetId>;

    /// Creates the widget for a pin of `node`.
    fn attach_pin_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        node: &N,
        pin: &P,
    ) -> Option<WidgetId>;

    fn attach_edge_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
    ) -> Option<WidgetId>;

    fn attach_edge_source_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        old: Option<&P>,
        new: Option<&P>,
    );

    fn attach_edge_target_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        old: Option<&P>,
        new: Option<&P>,
    );

    fn detach_node_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        _node: &N,
        widget: Option<WidgetId>,
    ) {
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn detach_pin_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        _pin: &P,
        widget: Option<WidgetId>,
    ) {
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn detach_edge_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        _edge: &E,
        widget: Option<WidgetId>,
    ) {
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn notify_node_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _node: &N,
        _widget: Option<WidgetId>,
    ) {
    }

    fn notify_pin_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _node: &N,
        _pin: &P,
        _widget: Option<WidgetId>,
    ) {
    }

    fn notify_edge_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _edge: &E,
        _widget: Option<WidgetId>,
    ) {
    }
}

/// Hooks that create no widgets at all, for purely logical scenes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVisuals;

impl<N, E> GraphVisuals<N, E> for NoVisuals {
    fn attach_node_widget(&mut self, _cx: &mut VisualContext<'_, N, E>, _node: &N) -> Option<WidgetId> {
        None
    }

    fn attach_edge_widget(&mut self, _cx: &mut VisualContext<'_, N, E>, _edge: &E) -> Option<WidgetId> {
        None
    }

    fn attach_edge_source_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        _edge: &E,
        _old: Option<&N>,
        _new: Option<&N>,
    ) {
    }

    fn attach_edge_target_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        _edge: &E,
        _old: Option<&N>,
        _new: Option<&N>,
    ) {
    }
}

impl<N, E, P> PinVisuals<N, E, P> for NoVisuals {
    fn attach_node_widget(&mut self, _cx: &mut VisualContext<'_, N, E, P>, _node: &N) -> Option<WidgetId> {
        None
    }

    fn attach_pin_widget(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _node: &N,
        _pin: &P,
    ) -> Option<WidgetId> {
        None
    }

    fn attach_edge_widget(&mut self, _cx: &mut VisualContext<'_, N, E, P>, _edge: &E) -> Option<WidgetId> {
        None
    }

    fn attach_edge_source_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _edge: &E,
        _old: Option<&P>,
        _new: Option<&P>,
    ) {
    }

    fn attach_edge_target_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        _edge: &E,
        _old: Option<&P>,
        _new: Option<&P>,
    ) {
    }
}
