//! Ready-made visuals that lay widgets out in two layers.
//!
//! Nodes go into a `main` layer, connections into a `connections` layer and
//! pins under the widget of their node. Connection widgets are anchored to
//! the widget of their current source and target (node or pin).

use std::fmt::Display;
use std::hash::Hash;

use super::hooks::{GraphVisuals, PinVisuals, VisualContext};
use crate::widget::{WidgetId, WidgetKind, WidgetTree};

/// Width reserved for a node widget.
pub const NODE_WIDTH: f32 = 160.0;
/// Height of a node header, above its pins.
pub const NODE_HEADER_HEIGHT: f32 = 28.0;
/// Vertical distance between two pins.
pub const PIN_SPACING: f32 = 22.0;

const COLUMNS: usize = 4;
const COLUMN_SPACING: f32 = 220.0;
const ROW_SPACING: f32 = 180.0;
const MARGIN: f32 = 40.0;

/// Visuals creating labelled widgets in a `main` and a `connections` layer.
///
/// Layers are created on first use. New nodes are placed on a grid; callers
/// may move them afterwards through the scene's widget tree.
#[derive(Clone, Debug, Default)]
pub struct LayeredVisuals {
    main_layer: Option<WidgetId>,
    connection_layer: Option<WidgetId>,
    placed: usize,
}

impl LayeredVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layer holding node widgets, if created yet.
    pub fn main_layer(&self) -> Option<WidgetId> {
        self.main_layer
    }

    /// Returns the layer holding connection widgets, if created yet.
    pub fn connection_layer(&self) -> Option<WidgetId> {
        self.connection_layer
    }

    fn layers(&mut self, widgets: &mut WidgetTree) -> (WidgetId, WidgetId) {
        let main = *self
            .main_layer
            .get_or_insert_with(|| widgets.create(WidgetKind::Layer, "main"));
        let connections = *self
            .connection_layer
            .get_or_insert_with(|| widgets.create(WidgetKind::Layer, "connections"));
        (main, connections)
    }

    fn create_node(&mut self, widgets: &mut WidgetTree, label: String) -> WidgetId {
        let (main, _) = self.layers(widgets);
        let id = widgets.create(WidgetKind::Node, label);
        let slot = self.placed;
        self.placed += 1;
        if let Some(w) = widgets.get_mut(id) {
            w.position = (
                MARGIN + (slot % COLUMNS) as f32 * COLUMN_SPACING,
                MARGIN + (slot / COLUMNS) as f32 * ROW_SPACING,
            );
        }
        widgets.add_child(main, id);
        id
    }

    fn create_connection(&mut self, widgets: &mut WidgetTree, label: String) -> WidgetId {
        let (_, connections) = self.layers(widgets);
        let id = widgets.create(WidgetKind::Connection, label);
        widgets.add_child(connections, id);
        id
    }

    fn create_pin(widgets: &mut WidgetTree, node_widget: Option<WidgetId>, label: String) -> WidgetId {
        let id = widgets.create(WidgetKind::Pin, label);
        if let Some(node) = node_widget {
            let index = widgets.children(node).len();
            if let Some(w) = widgets.get_mut(id) {
                w.position = (NODE_WIDTH, NODE_HEADER_HEIGHT + index as f32 * PIN_SPACING);
            }
            widgets.add_child(node, id);
        }
        id
    }
}

impl<N, E> GraphVisuals<N, E> for LayeredVisuals
where
    N: Display + Clone + Eq + Hash,
    E: Display + Clone + Eq + Hash,
{
    fn attach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E>, node: &N) -> Option<WidgetId> {
        Some(self.create_node(cx.widgets, node.to_string()))
    }

    fn attach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E>, edge: &E) -> Option<WidgetId> {
        Some(self.create_connection(cx.widgets, edge.to_string()))
    }

    fn attach_edge_source_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        _old: Option<&N>,
        new: Option<&N>,
    ) {
        if let Some(connection) = cx.edge_widget(edge) {
            let anchor = new.and_then(|n| cx.node_widget(n));
            cx.widgets.set_source_anchor(connection, anchor);
        }
    }

    fn attach_edge_target_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        _old: Option<&N>,
        new: Option<&N>,
    ) {
        if let Some(connection) = cx.edge_widget(edge) {
            let anchor = new.and_then(|n| cx.node_widget(n));
            cx.widgets.set_target_anchor(connection, anchor);
        }
    }
}

impl<N, E, P> PinVisuals<N, E, P> for LayeredVisuals
where
    N: Display + Clone + Eq + Hash,
    E: Display + Clone + Eq + Hash,
    P: Display + Clone + Eq + Hash,
{
    fn attach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, node: &N) -> Option<WidgetId> {
        Some(self.create_node(cx.widgets, node.to_string()))
    }

    fn attach_pin_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        node: &N,
        pin: &P,
    ) -> Option<WidgetId> {
        let node_widget = cx.node_widget(node);
        Some(Self::create_pin(cx.widgets, node_widget, pin.to_string()))
    }

    fn attach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, edge: &E) -> Option<WidgetId> {
        Some(self.create_connection(cx.widgets, edge.to_string()))
    }

    fn attach_edge_source_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        _old: Option<&P>,
        new: Option<&P>,
    ) {
        if let Some(connection) = cx.edge_widget(edge) {
            let anchor = new.and_then(|p| cx.pin_widget(p));
            cx.widgets.set_source_anchor(connection, anchor);
        }
    }

    fn attach_edge_target_anchor(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        _old: Option<&P>,
        new: Option<&P>,
    ) {
        if let Some(connection) = cx.edge_widget(edge) {
            let anchor = new.and_then(|p| cx.pin_widget(p));
            cx.widgets.set_target_anchor(connection, anchor);
        }
    }
}
