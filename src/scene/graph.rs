//! Scene of nodes and directed edges.
//!
//! `GraphScene` registers caller-defined node and edge keys, keeps each
//! edge's source and target node, and forwards every visual concern to a
//! [`GraphVisuals`] implementation.

use tracing::{debug, trace, warn};

use super::error::SceneError;
use super::hooks::{GraphVisuals, VisualContext};
use super::incidence::Incidence;
use super::objects::{ObjectMap, SceneKey, SceneObject};
use crate::widget::{WidgetId, WidgetTree};

/// A graph of nodes `N` and directed edges `E`, each optionally shown by a widget.
///
/// Edges start out unconnected; [`set_edge_source`](Self::set_edge_source)
/// and [`set_edge_target`](Self::set_edge_target) wire them to nodes.
/// Removing a node only detaches its edges; use
/// [`remove_node_with_edges`](Self::remove_node_with_edges) to drop them too.
pub struct GraphScene<N, E, V> {
    incidence: Incidence<N, E>,
    objects: ObjectMap<SceneObject<N, E>>,
    widgets: WidgetTree,
    visuals: V,
}

impl<N, E, V> GraphScene<N, E, V>
where
    N: SceneKey,
    E: SceneKey,
    V: GraphVisuals<N, E>,
{
    /// Creates an empty scene using `visuals` for all widget work.
    pub fn new(visuals: V) -> Self {
        Self {
            incidence: Incidence::new(),
            objects: ObjectMap::new(),
            widgets: WidgetTree::new(),
            visuals,
        }
    }

    fn split(&mut self) -> (&mut V, VisualContext<'_, N, E>) {
        (
            &mut self.visuals,
            VisualContext {
                widgets: &mut self.widgets,
                objects: &self.objects,
            },
        )
    }

    /// Registers `key` and returns the widget it ended up with.
    fn associate(&mut self, key: SceneObject<N, E>, widget: Option<WidgetId>) -> Option<WidgetId> {
        if self.objects.add_object(key.clone(), widget) {
            return widget;
        }
        warn!(?key, ?widget, "widget already belongs to another object, keeping object without widget");
        self.objects.add_object(key, None);
        None
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Adds a node and returns the widget created for it, if any.
    pub fn add_node(&mut self, node: N) -> Result<Option<WidgetId>, SceneError> {
        if self.incidence.contains_vertex(&node) {
            warn!(?node, "rejected duplicate node");
            return Err(SceneError::duplicate_node(&node));
        }

        let (visuals, mut cx) = self.split();
        let widget = visuals.attach_node_widget(&mut cx, &node);

        self.incidence.add_vertex(node.clone());
        let widget = self.associate(SceneObject::Node(node.clone()), widget);

        let (visuals, mut cx) = self.split();
        visuals.notify_node_added(&mut cx, &node, widget);

        debug!(?node, ?widget, "node added");
        Ok(widget)
    }

    /// Removes a node, leaving its edges registered but disconnected from it.
    pub fn remove_node(&mut self, node: &N) -> Result<(), SceneError> {
        let links = self
            .incidence
            .links(node)
            .cloned()
            .ok_or_else(|| SceneError::unknown_node(node))?;

        for edge in &links.outputs {
            self.rewire_source(edge, None);
        }
        for edge in &links.inputs {
            self.rewire_target(edge, None);
        }

        self.incidence.remove_vertex(node);

        let key = SceneObject::Node(node.clone());
        let widget = self.objects.find_widget(&key);
        let (visuals, mut cx) = self.split();
        visuals.detach_node_widget(&mut cx, node, widget);
        self.objects.remove_object(&key);

        debug!(?node, detached = links.inputs.len() + links.outputs.len(), "node removed");
        Ok(())
    }

    /// Removes a node together with every edge entering or leaving it.
    pub fn remove_node_with_edges(&mut self, node: &N) -> Result<(), SceneError> {
        if !self.incidence.contains_vertex(node) {
            return Err(SceneError::unknown_node(node));
        }
        for edge in self.incidence.find_edges(node, true, true) {
            // A self-loop shows up in both lists.
            if self.incidence.contains_edge(&edge) {
                self.remove_edge(&edge)?;
            }
        }
        self.remove_node(node)
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Adds an unconnected edge and returns the widget created for it, if any.
    pub fn add_edge(&mut self, edge: E) -> Result<Option<WidgetId>, SceneError> {
        if self.incidence.contains_edge(&edge) {
            warn!(?edge, "rejected duplicate edge");
            return Err(SceneError::duplicate_edge(&edge));
        }

        let (visuals, mut cx) = self.split();
        let widget = visuals.attach_edge_widget(&mut cx, &edge);

        self.incidence.add_edge(edge.clone());
        let widget = self.associate(SceneObject::Edge(edge.clone()), widget);

        let (visuals, mut cx) = self.split();
        visuals.notify_edge_added(&mut cx, &edge, widget);

        debug!(?edge, ?widget, "edge added");
        Ok(widget)
    }

    /// Disconnects and removes an edge.
    pub fn remove_edge(&mut self, edge: &E) -> Result<(), SceneError> {
        if !self.incidence.contains_edge(edge) {
            return Err(SceneError::unknown_edge(edge));
        }

        self.rewire_source(edge, None);
        self.rewire_target(edge, None);
        self.incidence.remove_edge(edge);

        let key = SceneObject::Edge(edge.clone());
        let widget = self.objects.find_widget(&key);
        let (visuals, mut cx) = self.split();
        visuals.detach_edge_widget(&mut cx, edge, widget);
        self.objects.remove_object(&key);

        debug!(?edge, "edge removed");
        Ok(())
    }

    /// Sets (or clears, with `None`) the source node of an edge.
    ///
    /// Setting the current source again does nothing, not even a hook call.
    pub fn set_edge_source(&mut self, edge: &E, source: Option<&N>) -> Result<(), SceneError> {
        let changes = self
            .incidence
            .check_endpoint_change(edge, source, true, |n| SceneError::unknown_node(n))?;
        if !changes {
            trace!(?edge, ?source, "edge source unchanged");
            return Ok(());
        }
        self.rewire_source(edge, source.cloned());
        Ok(())
    }

    /// Sets (or clears, with `None`) the target node of an edge.
    ///
    /// Setting the current target again does nothing, not even a hook call.
    pub fn set_edge_target(&mut self, edge: &E, target: Option<&N>) -> Result<(), SceneError> {
        let changes = self
            .incidence
            .check_endpoint_change(edge, target, false, |n| SceneError::unknown_node(n))?;
        if !changes {
            trace!(?edge, ?target, "edge target unchanged");
            return Ok(());
        }
        self.rewire_target(edge, target.cloned());
        Ok(())
    }

    fn rewire_source(&mut self, edge: &E, source: Option<N>) {
        let Some(old) = self.incidence.set_source(edge, source.clone()) else {
            return;
        };
        trace!(?edge, ?old, new = ?source, "edge source moved");
        let (visuals, mut cx) = self.split();
        visuals.attach_edge_source_anchor(&mut cx, edge, old.as_ref(), source.as_ref());
    }

    fn rewire_target(&mut self, edge: &E, target: Option<N>) {
        let Some(old) = self.incidence.set_target(edge, target.clone()) else {
            return;
        };
        trace!(?edge, ?old, new = ?target, "edge target moved");
        let (visuals, mut cx) = self.split();
        visuals.attach_edge_target_anchor(&mut cx, edge, old.as_ref(), target.as_ref());
    }

    /// Returns the source node of an edge.
    pub fn edge_source(&self, edge: &E) -> Option<&N> {
        self.incidence.source(edge)
    }

    /// Returns the target node of an edge.
    pub fn edge_target(&self, edge: &E) -> Option<&N> {
        self.incidence.target(edge)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns a fresh list of edges touching `node`.
    ///
    /// Input edges come first when both directions are allowed. Unknown nodes
    /// have no edges.
    pub fn find_node_edges(&self, node: &N, allow_output_edges: bool, allow_input_edges: bool) -> Vec<E> {
        self.incidence
            .find_edges(node, allow_output_edges, allow_input_edges)
    }

    /// Returns every edge whose source is `source` and whose target is `target`.
    pub fn find_edges_between(&self, source: &N, target: &N) -> Vec<E> {
        self.incidence.edges_between(source, target)
    }

    pub fn is_node(&self, node: &N) -> bool {
        self.incidence.contains_vertex(node)
    }

    pub fn is_edge(&self, edge: &E) -> bool {
        self.incidence.contains_edge(edge)
    }

    /// Iterates all nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.incidence.vertices()
    }

    /// Iterates all edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.incidence.edges()
    }

    pub fn node_count(&self) -> usize {
        self.incidence.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.incidence.edge_count()
    }

    // ========================================================================
    // Widgets
    // ========================================================================

    /// Returns the widget associated with an object.
    pub fn find_widget(&self, object: &SceneObject<N, E>) -> Option<WidgetId> {
        self.objects.find_widget(object)
    }

    pub fn node_widget(&self, node: &N) -> Option<WidgetId> {
        self.find_widget(&SceneObject::Node(node.clone()))
    }

    pub fn edge_widget(&self, edge: &E) -> Option<WidgetId> {
        self.find_widget(&SceneObject::Edge(edge.clone()))
    }

    /// Returns the object a widget stands for.
    pub fn find_object(&self, widget: WidgetId) -> Option<&SceneObject<N, E>> {
        self.objects.find_object(widget)
    }

    pub fn widgets(&self) -> &WidgetTree {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetTree {
        &mut self.widgets
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut V {
        &mut self.visuals
    }

    /// Verifies the incidence bookkeeping and the object map agree.
    pub fn check_consistency(&self) -> Result<(), SceneError> {
        self.incidence.check()?;
        for node in self.nodes() {
            if !self.objects.is_object(&SceneObject::Node(node.clone())) {
                return Err(SceneError::unknown_node(node));
            }
        }
        for edge in self.edges() {
            if !self.objects.is_object(&SceneObject::Edge(edge.clone())) {
                return Err(SceneError::unknown_edge(edge));
            }
        }
        if self.objects.len() != self.node_count() + self.edge_count() {
            return Err(SceneError::Inconsistent {
                subject: String::from("scene"),
                reason: "object map holds stale entries",
            });
        }
        Ok(())
    }
}
