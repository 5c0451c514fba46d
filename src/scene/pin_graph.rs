//! Scene of nodes, pins and edges between pins.
//!
//! Every pin belongs to exactly one node for its whole life. Edges connect
//! pins, never nodes directly. Removal cascades downwards: a node takes its
//! pins with it, and the `_with_edges` variants also take the edges touching
//! those pins. Without `_with_edges`, edges are only detached and stay in the
//! scene with an empty endpoint.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use super::error::SceneError;
use super::hooks::{PinVisuals, VisualContext};
use super::incidence::Incidence;
use super::objects::{ObjectMap, SceneKey, SceneObject};
use crate::widget::{WidgetId, WidgetTree};

/// A graph of nodes `N` owning pins `P`, with directed edges `E` between pins.
pub struct GraphPinScene<N, E, P, V> {
    node_pins: HashMap<N, HashSet<P>>,
    pin_nodes: HashMap<P, N>,
    incidence: Incidence<P, E>,
    objects: ObjectMap<SceneObject<N, E, P>>,
    widgets: WidgetTree,
    visuals: V,
}

impl<N, E, P, V> GraphPinScene<N, E, P, V>
where
    N: SceneKey,
    E: SceneKey,
    P: SceneKey,
    V: PinVisuals<N, E, P>,
{
    /// Creates an empty scene using `visuals` for all widget work.
    pub fn new(visuals: V) -> Self {
        Self {
            node_pins: HashMap::new(),
            pin_nodes: HashMap::new(),
            incidence: Incidence::new(),
            objects: ObjectMap::new(),
            widgets: WidgetTree::new(),
            visuals,
        }
    }

    fn split(&mut self) -> (&mut V, VisualContext<'_, N, E, P>) {
        (
            &mut self.visuals,
            VisualContext {
                widgets: &mut self.widgets,
                objects: &self.objects,
            },
        )
    }

    /// Registers `key` and returns the widget it ended up with.
    fn associate(&mut self, key: SceneObject<N, E, P>, widget: Option<WidgetId>) -> Option<WidgetId> {
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

    /// Adds a node without pins and returns the widget created for it, if any.
    pub fn add_node(&mut self, node: N) -> Result<Option<WidgetId>, SceneError> {
        if self.node_pins.contains_key(&node) {
            warn!(?node, "rejected duplicate node");
            return Err(SceneError::duplicate_node(&node));
        }

        let (visuals, mut cx) = self.split();
        let widget = visuals.attach_node_widget(&mut cx, &node);

        self.node_pins.insert(node.clone(), HashSet::new());
        let widget = self.associate(SceneObject::Node(node.clone()), widget);

        let (visuals, mut cx) = self.split();
        visuals.notify_node_added(&mut cx, &node, widget);

        debug!(?node, ?widget, "node added");
        Ok(widget)
    }

    /// Removes a node and all of its pins.
    ///
    /// Edges attached to those pins are detached, not removed.
    pub fn remove_node(&mut self, node: &N) -> Result<(), SceneError> {
        let pins: Vec<P> = self
            .node_pins
            .get(node)
            .ok_or_else(|| SceneError::unknown_node(node))?
            .iter()
            .cloned()
            .collect();

        for pin in &pins {
            self.remove_pin(pin)?;
        }
        self.node_pins.remove(node);

        let key = SceneObject::Node(node.clone());
        let widget = self.objects.find_widget(&key);
        let (visuals, mut cx) = self.split();
        visuals.detach_node_widget(&mut cx, node, widget);
        self.objects.remove_object(&key);

        debug!(?node, pins = pins.len(), "node removed");
        Ok(())
    }

    /// Removes a node, its pins, and every edge attached to any of those pins.
    pub fn remove_node_with_edges(&mut self, node: &N) -> Result<(), SceneError> {
        let pins: Vec<P> = self
            .node_pins
            .get(node)
            .ok_or_else(|| SceneError::unknown_node(node))?
            .iter()
            .cloned()
            .collect();

        for pin in &pins {
            self.remove_incident_edges(pin)?;
        }
        self.remove_node(node)
    }

    // ========================================================================
    // Pins
    // ========================================================================

    /// Adds a pin owned by `node` and returns the widget created for it, if any.
    pub fn add_pin(&mut self, node: &N, pin: P) -> Result<Option<WidgetId>, SceneError> {
        if !self.node_pins.contains_key(node) {
            warn!(?node, ?pin, "rejected pin for unknown node");
            return Err(SceneError::unknown_node(node));
        }
        if self.pin_nodes.contains_key(&pin) {
            warn!(?pin, "rejected duplicate pin");
            return Err(SceneError::duplicate_pin(&pin));
        }

        let (visuals, mut cx) = self.split();
        let widget = visuals.attach_pin_widget(&mut cx, node, &pin);

        self.incidence.add_vertex(pin.clone());
        if let Some(pins) = self.node_pins.get_mut(node) {
            pins.insert(pin.clone());
        }
        self.pin_nodes.insert(pin.clone(), node.clone());
        let widget = self.associate(SceneObject::Pin(pin.clone()), widget);

        let (visuals, mut cx) = self.split();
        visuals.notify_pin_added(&mut cx, node, &pin, widget);

        debug!(?node, ?pin, ?widget, "pin added");
        Ok(widget)
    }

    /// Removes a pin, leaving its edges registered but disconnected from it.
    pub fn remove_pin(&mut self, pin: &P) -> Result<(), SceneError> {
        let links = self
            .incidence
            .links(pin)
            .cloned()
            .ok_or_else(|| SceneError::unknown_pin(pin))?;

        for edge in &links.outputs {
            self.rewire_source(edge, None);
        }
        for edge in &links.inputs {
            self.rewire_target(edge, None);
        }

        self.incidence.remove_vertex(pin);
        if let Some(node) = self.pin_nodes.remove(pin) {
            if let Some(pins) = self.node_pins.get_mut(&node) {
                pins.remove(pin);
            }
        }

        let key = SceneObject::Pin(pin.clone());
        let widget = self.objects.find_widget(&key);
        let (visuals, mut cx) = self.split();
        visuals.detach_pin_widget(&mut cx, pin, widget);
        self.objects.remove_object(&key);

        debug!(?pin, detached = links.inputs.len() + links.outputs.len(), "pin removed");
        Ok(())
    }

    /// Removes a pin together with every edge attached to it.
    pub fn remove_pin_with_edges(&mut self, pin: &P) -> Result<(), SceneError> {
        if !self.incidence.contains_vertex(pin) {
            return Err(SceneError::unknown_pin(pin));
        }
        self.remove_incident_edges(pin)?;
        self.remove_pin(pin)
    }

    fn remove_incident_edges(&mut self, pin: &P) -> Result<(), SceneError> {
        for edge in self.incidence.find_edges(pin, true, true) {
            // Self-loops and edges between two pins of the same node can be
            // listed twice.
            if self.incidence.contains_edge(&edge) {
                self.remove_edge(&edge)?;
            }
        }
        Ok(())
    }

    /// Returns the node owning a pin.
    pub fn pin_node(&self, pin: &P) -> Option<&N> {
        self.pin_nodes.get(pin)
    }

    /// Returns the pins of a node.
    ///
    /// `None` means the node is unknown; a known node without pins yields an
    /// empty set.
    pub fn node_pins(&self, node: &N) -> Option<&HashSet<P>> {
        self.node_pins.get(node)
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

    /// Sets (or clears, with `None`) the source pin of an edge.
    ///
    /// Setting the current source again does nothing, not even a hook call.
    pub fn set_edge_source(&mut self, edge: &E, source: Option<&P>) -> Result<(), SceneError> {
        let changes = self
            .incidence
            .check_endpoint_change(edge, source, true, |p| SceneError::unknown_pin(p))?;
        if !changes {
            trace!(?edge, ?source, "edge source unchanged");
            return Ok(());
        }
        self.rewire_source(edge, source.cloned());
        Ok(())
    }

    /// Sets (or clears, with `None`) the target pin of an edge.
    ///
    /// Setting the current target again does nothing, not even a hook call.
    pub fn set_edge_target(&mut self, edge: &E, target: Option<&P>) -> Result<(), SceneError> {
        let changes = self
            .incidence
            .check_endpoint_change(edge, target, false, |p| SceneError::unknown_pin(p))?;
        if !changes {
            trace!(?edge, ?target, "edge target unchanged");
            return Ok(());
        }
        self.rewire_target(edge, target.cloned());
        Ok(())
    }

    fn rewire_source(&mut self, edge: &E, source: Option<P>) {
        let Some(old) = self.incidence.set_source(edge, source.clone()) else {
            return;
        };
        trace!(?edge, ?old, new = ?source, "edge source moved");
        let (visuals, mut cx) = self.split();
        visuals.attach_edge_source_anchor(&mut cx, edge, old.as_ref(), source.as_ref());
    }

    fn rewire_target(&mut self, edge: &E, target: Option<P>) {
        let Some(old) = self.incidence.set_target(edge, target.clone()) else {
            return;
        };
        trace!(?edge, ?old, new = ?target, "edge target moved");
        let (visuals, mut cx) = self.split();
        visuals.attach_edge_target_anchor(&mut cx, edge, old.as_ref(), target.as_ref());
    }

    /// Returns the source pin of an edge.
    pub fn edge_source(&self, edge: &E) -> Option<&P> {
        self.incidence.source(edge)
    }

    /// Returns the target pin of an edge.
    pub fn edge_target(&self, edge: &E) -> Option<&P> {
        self.incidence.target(edge)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns a fresh list of edges touching `pin`, input edges first.
    pub fn find_pin_edges(&self, pin: &P, allow_output_edges: bool, allow_input_edges: bool) -> Vec<E> {
        self.incidence
            .find_edges(pin, allow_output_edges, allow_input_edges)
    }

    /// Returns the edges touching any pin of `node`, each edge once.
    pub fn find_node_edges(&self, node: &N, allow_output_edges: bool, allow_input_edges: bool) -> Vec<E> {
        let Some(pins) = self.node_pins.get(node) else {
            return Vec::new();
        };
        let mut found: Vec<E> = Vec::new();
        for pin in pins {
            for edge in self.find_pin_edges(pin, allow_output_edges, allow_input_edges) {
                if !found.contains(&edge) {
                    found.push(edge);
                }
            }
        }
        found
    }

    /// Returns every edge going from `source_pin` to `target_pin`.
    pub fn find_edges_between(&self, source_pin: &P, target_pin: &P) -> Vec<E> {
        self.incidence.edges_between(source_pin, target_pin)
    }

    pub fn is_node(&self, node: &N) -> bool {
        self.node_pins.contains_key(node)
    }

    pub fn is_pin(&self, pin: &P) -> bool {
        self.pin_nodes.contains_key(pin)
    }

    pub fn is_edge(&self, edge: &E) -> bool {
        self.incidence.contains_edge(edge)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.node_pins.keys()
    }

    pub fn pins(&self) -> impl Iterator<Item = &P> {
        self.pin_nodes.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.incidence.edges()
    }

    pub fn node_count(&self) -> usize {
        self.node_pins.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pin_nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.incidence.edge_count()
    }

    // ========================================================================
    // Widgets
    // ========================================================================

    pub fn find_widget(&self, object: &SceneObject<N, E, P>) -> Option<WidgetId> {
        self.objects.find_widget(object)
    }

    pub fn node_widget(&self, node: &N) -> Option<WidgetId> {
        self.find_widget(&SceneObject::Node(node.clone()))
    }

    pub fn pin_widget(&self, pin: &P) -> Option<WidgetId> {
        self.find_widget(&SceneObject::Pin(pin.clone()))
    }

    pub fn edge_widget(&self, edge: &E) -> Option<WidgetId> {
        self.find_widget(&SceneObject::Edge(edge.clone()))
    }

    pub fn find_object(&self, widget: WidgetId) -> Option<&SceneObject<N, E, P>> {
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

    /// Verifies pin ownership, incidence and the object map all agree.
    pub fn check_consistency(&self) -> Result<(), SceneError> {
        self.incidence.check()?;

        for (pin, node) in &self.pin_nodes {
            let owned = self
                .node_pins
                .get(node)
                .is_some_and(|pins| pins.contains(pin));
            if !owned || !self.incidence.contains_vertex(pin) {
                return Err(SceneError::unknown_pin(pin));
            }
        }
        let owned_total: usize = self.node_pins.values().map(HashSet::len).sum();
        if owned_total != self.pin_nodes.len() || self.incidence.vertex_count() != self.pin_nodes.len() {
            return Err(SceneError::Inconsistent {
                subject: String::from("scene"),
                reason: "pin ownership tables disagree",
            });
        }

        let expected = self.node_count() + self.pin_count() + self.edge_count();
        let registered = self
            .nodes()
            .all(|n| self.objects.is_object(&SceneObject::Node(n.clone())))
            && self
                .pins()
                .all(|p| self.objects.is_object(&SceneObject::Pin(p.clone())))
            && self
                .edges()
                .all(|e| self.objects.is_object(&SceneObject::Edge(e.clone())));
        if !registered || self.objects.len() != expected {
            return Err(SceneError::Inconsistent {
                subject: String::from("scene"),
                reason: "object map disagrees with registered entities",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::RecordingVisuals;

    type Scene = GraphPinScene<&'static str, &'static str, &'static str, RecordingVisuals>;

    fn scene() -> Scene {
        GraphPinScene::new(RecordingVisuals::default())
    }

    /// Node N with pins P1 and P2, edge E from P1 to P2.
    fn wired() -> Scene {
        let mut s = scene();
        s.add_node("N").unwrap();
        s.add_pin(&"N", "P1").unwrap();
        s.add_pin(&"N", "P2").unwrap();
        s.add_edge("E").unwrap();
        s.set_edge_source(&"E", Some(&"P1")).unwrap();
        s.set_edge_target(&"E", Some(&"P2")).unwrap();
        s.visuals_mut().take();
        s
    }

    #[test]
    fn test_add_pin_hook_order() {
        let mut s = scene();
        s.add_node("N").unwrap();
        s.visuals_mut().take();

        let widget = s.add_pin(&"N", "P1").unwrap();
        assert!(widget.is_some());
        assert_eq!(
            s.visuals_mut().take(),
            vec!["attach_pin \"N\" \"P1\"", "pin_added \"N\" \"P1\""]
        );
        assert_eq!(s.pin_node(&"P1"), Some(&"N"));
        assert_eq!(s.pin_widget(&"P1"), widget);
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_add_pin_preconditions() {
        let mut s = wired();
        assert_eq!(s.add_pin(&"X", "P9"), Err(SceneError::unknown_node(&"X")));
        assert_eq!(s.add_pin(&"N", "P1"), Err(SceneError::duplicate_pin(&"P1")));
        assert!(s.visuals_mut().take().is_empty());
        assert!(!s.is_pin(&"P9"));
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_node_pins_distinguishes_unknown_from_empty() {
        let mut s = scene();
        s.add_node("Empty").unwrap();
        assert_eq!(s.node_pins(&"Empty").map(HashSet::len), Some(0));
        assert!(s.node_pins(&"Missing").is_none());
    }

    #[test]
    fn test_scenario_pin_detach_then_node_cascade() {
        let mut s = wired();
        assert_eq!(s.find_pin_edges(&"P1", true, false), vec!["E"]);
        assert_eq!(s.find_edges_between(&"P1", &"P2"), vec!["E"]);

        s.remove_pin(&"P1").unwrap();
        assert!(s.is_edge(&"E"));
        assert_eq!(s.edge_source(&"E"), None);
        assert_eq!(s.edge_target(&"E"), Some(&"P2"));
        assert_eq!(s.pin_node(&"P1"), None);
        assert_eq!(s.node_pins(&"N").map(HashSet::len), Some(1));

        s.remove_node_with_edges(&"N").unwrap();
        assert!(!s.is_pin(&"P2"));
        assert!(!s.is_edge(&"E"));
        assert!(!s.is_node(&"N"));
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_node_strands_edges() {
        let mut s = wired();
        s.remove_node(&"N").unwrap();
        assert!(!s.is_node(&"N"));
        assert!(!s.is_pin(&"P1"));
        assert!(!s.is_pin(&"P2"));
        // The edge survives with both ends cleared
        assert!(s.is_edge(&"E"));
        assert_eq!(s.edge_source(&"E"), None);
        assert_eq!(s.edge_target(&"E"), None);
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_node_hook_order() {
        let mut s = scene();
        s.add_node("N").unwrap();
        s.add_pin(&"N", "P").unwrap();
        s.visuals_mut().take();

        s.remove_node(&"N").unwrap();
        assert_eq!(s.visuals_mut().take(), vec!["detach_pin \"P\"", "detach_node \"N\""]);
    }

    #[test]
    fn test_remove_pin_with_edges() {
        let mut s = wired();
        s.add_node("M").unwrap();
        s.add_pin(&"M", "Q").unwrap();
        s.add_edge("F").unwrap();
        s.set_edge_source(&"F", Some(&"Q")).unwrap();
        s.set_edge_target(&"F", Some(&"P2")).unwrap();

        s.remove_pin_with_edges(&"P2").unwrap();
        assert!(!s.is_edge(&"E"));
        assert!(!s.is_edge(&"F"));
        assert!(s.is_pin(&"P1"));
        assert!(s.is_pin(&"Q"));
        assert!(s.find_pin_edges(&"Q", true, true).is_empty());
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_node_with_edges_leaves_unrelated_edges() {
        let mut s = wired();
        s.add_node("M").unwrap();
        s.add_pin(&"M", "Q1").unwrap();
        s.add_pin(&"M", "Q2").unwrap();
        s.add_edge("F").unwrap();
        s.set_edge_source(&"F", Some(&"Q1")).unwrap();
        s.set_edge_target(&"F", Some(&"Q2")).unwrap();
        s.add_edge("G").unwrap();
        s.set_edge_source(&"G", Some(&"P1")).unwrap();
        s.set_edge_target(&"G", Some(&"Q2")).unwrap();

        s.remove_node_with_edges(&"N").unwrap();
        assert!(!s.is_edge(&"E"));
        assert!(!s.is_edge(&"G"));
        assert!(s.is_edge(&"F"));
        assert_eq!(s.find_edges_between(&"Q1", &"Q2"), vec!["F"]);
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_pin_self_loop_removed_once() {
        let mut s = wired();
        s.add_edge("L").unwrap();
        s.set_edge_source(&"L", Some(&"P1")).unwrap();
        s.set_edge_target(&"L", Some(&"P1")).unwrap();

        s.remove_pin_with_edges(&"P1").unwrap();
        assert!(!s.is_edge(&"L"));
        assert!(!s.is_edge(&"E"));
        assert!(s.check_consistency().is_ok());
    }

    #[test]
    fn test_set_edge_endpoint_preconditions() {
        let mut s = wired();
        assert_eq!(
            s.set_edge_source(&"E", Some(&"N")),
            Err(SceneError::unknown_pin(&"N"))
        );
        assert_eq!(
            s.set_edge_target(&"nope", None),
            Err(SceneError::unknown_edge(&"nope"))
        );
        s.set_edge_target(&"E", Some(&"P2")).unwrap();
        assert!(s.visuals_mut().take().is_empty());
        assert_eq!(s.find_pin_edges(&"P2", false, true), vec!["E"]);
    }

    #[test]
    fn test_find_node_edges_over_pins() {
        let mut s = wired();
        s.add_node("M").unwrap();
        s.add_pin(&"M", "Q").unwrap();
        s.add_edge("F").unwrap();
        s.set_edge_source(&"F", Some(&"P2")).unwrap();
        s.set_edge_target(&"F", Some(&"Q")).unwrap();

        let mut all = s.find_node_edges(&"N", true, true);
        all.sort();
        assert_eq!(all, vec!["E", "F"]);

        assert_eq!(s.find_node_edges(&"M", false, true), vec!["F"]);
        assert!(s.find_node_edges(&"M", true, false).is_empty());
        assert!(s.find_node_edges(&"unknown", true, true).is_empty());
    }

    #[test]
    fn test_pin_widgets_detach_on_removal() {
        let mut s = wired();
        let pin_widget = s.pin_widget(&"P1").unwrap();
        let edge_widget = s.edge_widget(&"E").unwrap();

        s.remove_node_with_edges(&"N").unwrap();
        assert_eq!(s.widgets().parent(pin_widget), None);
        assert_eq!(s.widgets().parent(edge_widget), None);
        assert_eq!(s.find_object(pin_widget), None);
    }

    #[test]
    fn test_pin_owner_is_stable() {
        let mut s = wired();
        s.add_node("M").unwrap();
        s.add_pin(&"M", "Q").unwrap();
        s.add_edge("F").unwrap();
        s.set_edge_source(&"F", Some(&"Q")).unwrap();
        s.set_edge_target(&"F", Some(&"P1")).unwrap();
        s.remove_edge(&"F").unwrap();

        assert_eq!(s.pin_node(&"P1"), Some(&"N"));
        assert_eq!(s.pin_node(&"Q"), Some(&"M"));
    }

    #[test]
    fn test_detach_hooks_can_look_up_pin_widget() {
        let mut s = scene();
        let node = s.add_node("N").unwrap();
        let pin = s.add_pin(&"N", "P").unwrap();
        assert!(pin.is_some());

        s.remove_node(&"N").unwrap();
        assert_eq!(
            s.visuals().detach_lookups,
            vec![(String::from("\"P\""), pin), (String::from("\"N\""), node)]
        );
    }

    #[test]
    fn test_remove_pin_with_edges_hooks_see_widgets() {
        let mut s = wired();
        let pin = s.pin_widget(&"P1");
        let edge = s.edge_widget(&"E");

        s.remove_pin_with_edges(&"P1").unwrap();
        assert_eq!(
            s.visuals().detach_lookups,
            vec![(String::from("\"E\""), edge), (String::from("\"P1\""), pin)]
        );
    }

    #[test]
    fn test_widget_claimed_by_another_pin_is_not_returned() {
        let mut s = wired();
        let shared = s.pin_widget(&"P1");
        s.visuals_mut().reuse = shared;

        assert_eq!(s.add_pin(&"N", "P3"), Ok(None));
        assert_eq!(s.pin_widget(&"P3"), None);
        assert_eq!(s.pin_widget(&"P1"), shared);

        s.remove_pin(&"P3").unwrap();
        assert!(s.widgets().parent(shared.unwrap()).is_some());
        assert!(s.check_consistency().is_ok());
    }
}
