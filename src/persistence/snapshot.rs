//! Snapshot serialization for save/load functionality.
//!
//! A snapshot captures the topology of a scene: its keys and the endpoints
//! of every edge, plus where each node widget sat. Widgets themselves are not
//! part of it; restoring a snapshot replays the scene operations, so the
//! visuals recreate them, and then moves node widgets back into place.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::scene::{GraphPinScene, GraphScene, GraphVisuals, PinVisuals, SceneError, SceneKey};
use crate::widget::{WidgetId, WidgetTree};

/// Current snapshot format version.
/// Increment this when making breaking changes to the format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Access to the format version of a snapshot.
pub trait Versioned {
    fn version(&self) -> u32;

    /// Check if this snapshot version is compatible with the current format.
    fn is_compatible(&self) -> bool {
        self.version() <= SNAPSHOT_VERSION
    }
}

/// An edge with its endpoints (nodes or pins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord<E, T> {
    pub edge: E,
    pub source: Option<T>,
    pub target: Option<T>,
}

/// Widget position, relative to the widget's parent.
pub type Position = (f32, f32);

/// Topology of a [`GraphScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot<N, E> {
    /// Snapshot format version for future compatibility.
    pub version: u32,
    pub nodes: Vec<N>,
    pub edges: Vec<EdgeRecord<E, N>>,
    /// Positions of nodes that had a widget.
    #[serde(default)]
    pub positions: Vec<(N, Position)>,
}

impl<N, E> Default for GraphSnapshot<N, E> {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
            positions: Vec::new(),
        }
    }
}

impl<N, E> Versioned for GraphSnapshot<N, E> {
    fn version(&self) -> u32 {
        self.version
    }
}

/// A node with the pins it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord<N, P> {
    pub node: N,
    pub pins: Vec<P>,
    /// Where the node widget sat, if it had one.
    #[serde(default)]
    pub position: Option<Position>,
}

/// Topology of a [`GraphPinScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinGraphSnapshot<N, E, P> {
    /// Snapshot format version for future compatibility.
    pub version: u32,
    pub nodes: Vec<NodeRecord<N, P>>,
    pub edges: Vec<EdgeRecord<E, P>>,
}

impl<N, E, P> Default for PinGraphSnapshot<N, E, P> {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<N, E, P> Versioned for PinGraphSnapshot<N, E, P> {
    fn version(&self) -> u32 {
        self.version
    }
}

/// Error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// File I/O error.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Incompatible snapshot version.
    #[error("Incompatible snapshot version: found {found}, expected <= {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },
    /// The snapshot describes a scene that cannot exist (duplicates, dangling endpoints).
    #[error("Invalid snapshot: {0}")]
    Scene(#[from] SceneError),
}

fn position_of(widgets: &WidgetTree, widget: Option<WidgetId>) -> Option<Position> {
    widget.and_then(|w| widgets.get(w)).map(|w| w.position)
}

fn move_to(widgets: &mut WidgetTree, widget: Option<WidgetId>, position: Position) {
    if let Some(w) = widget.and_then(|w| widgets.get_mut(w)) {
        w.position = position;
    }
}

fn check_version(snapshot: &impl Versioned) -> Result<(), SnapshotError> {
    if snapshot.is_compatible() {
        Ok(())
    } else {
        Err(SnapshotError::IncompatibleVersion {
            found: snapshot.version(),
            expected: SNAPSHOT_VERSION,
        })
    }
}

impl<N, E, V> GraphScene<N, E, V>
where
    N: SceneKey,
    E: SceneKey,
    V: GraphVisuals<N, E>,
{
    /// Captures the nodes and edge endpoints of this scene.
    pub fn snapshot(&self) -> GraphSnapshot<N, E> {
        GraphSnapshot {
            version: SNAPSHOT_VERSION,
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|edge| EdgeRecord {
                    edge: edge.clone(),
                    source: self.edge_source(edge).cloned(),
                    target: self.edge_target(edge).cloned(),
                })
                .collect(),
            positions: self
                .nodes()
                .filter_map(|node| {
                    position_of(self.widgets(), self.node_widget(node)).map(|pos| (node.clone(), pos))
                })
                .collect(),
        }
    }

    /// Builds a scene from a snapshot, running every hook of `visuals` as
    /// the entities are added and wired.
    pub fn restore(snapshot: &GraphSnapshot<N, E>, visuals: V) -> Result<Self, SnapshotError> {
        check_version(snapshot)?;

        let mut scene = Self::new(visuals);
        for node in &snapshot.nodes {
            scene.add_node(node.clone())?;
        }
        for record in &snapshot.edges {
            scene.add_edge(record.edge.clone())?;
            scene.set_edge_source(&record.edge, record.source.as_ref())?;
            scene.set_edge_target(&record.edge, record.target.as_ref())?;
        }
        for (node, position) in &snapshot.positions {
            let widget = scene.node_widget(node);
            move_to(scene.widgets_mut(), widget, *position);
        }

        debug!(
            nodes = scene.node_count(),
            edges = scene.edge_count(),
            "graph scene restored"
        );
        Ok(scene)
    }
}

impl<N, E, P, V> GraphPinScene<N, E, P, V>
where
    N: SceneKey,
    E: SceneKey,
    P: SceneKey,
    V: PinVisuals<N, E, P>,
{
    /// Captures the nodes, their pins and the edge endpoints of this scene.
    pub fn snapshot(&self) -> PinGraphSnapshot<N, E, P> {
        PinGraphSnapshot {
            version: SNAPSHOT_VERSION,
            nodes: self
                .nodes()
                .map(|node| NodeRecord {
                    node: node.clone(),
                    pins: self
                        .node_pins(node)
                        .map(|pins| pins.iter().cloned().collect())
                        .unwrap_or_default(),
                    position: position_of(self.widgets(), self.node_widget(node)),
                })
                .collect(),
            edges: self
                .edges()
                .map(|edge| EdgeRecord {
                    edge: edge.clone(),
                    source: self.edge_source(edge).cloned(),
                    target: self.edge_target(edge).cloned(),
                })
                .collect(),
        }
    }

    /// Builds a scene from a snapshot, running every hook of `visuals` as
    /// the entities are added and wired.
    pub fn restore(snapshot: &PinGraphSnapshot<N, E, P>, visuals: V) -> Result<Self, SnapshotError> {
        check_version(snapshot)?;

        let mut scene = Self::new(visuals);
        for record in &snapshot.nodes {
            let widget = scene.add_node(record.node.clone())?;
            if let Some(position) = record.position {
                move_to(scene.widgets_mut(), widget, position);
            }
            for pin in &record.pins {
                scene.add_pin(&record.node, pin.clone())?;
            }
        }
        for record in &snapshot.edges {
            scene.add_edge(record.edge.clone())?;
            scene.set_edge_source(&record.edge, record.source.as_ref())?;
            scene.set_edge_target(&record.edge, record.target.as_ref())?;
        }

        debug!(
            nodes = scene.node_count(),
            pins = scene.pin_count(),
            edges = scene.edge_count(),
            "pin scene restored"
        );
        Ok(scene)
    }
}

/// Save a snapshot to a JSON file.
pub fn save_to_file<T: Serialize>(snapshot: &T, path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Load a snapshot from a JSON file.
pub fn load_from_file<T>(path: &Path) -> Result<T, SnapshotError>
where
    T: DeserializeOwned + Versioned,
{
    let json = std::fs::read_to_string(path)?;
    let snapshot: T = serde_json::from_str(&json)?;
    check_version(&snapshot)?;
    info!(path = %path.display(), "snapshot loaded");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{LayeredVisuals, NoVisuals};

    type Pins = GraphPinScene<String, String, String, NoVisuals>;

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn pin_scene() -> Pins {
        let mut scene: Pins = GraphPinScene::new(NoVisuals);
        scene.add_node(s("osc")).unwrap();
        scene.add_pin(&s("osc"), s("osc.out")).unwrap();
        scene.add_node(s("vca")).unwrap();
        scene.add_pin(&s("vca"), s("vca.in")).unwrap();
        scene.add_pin(&s("vca"), s("vca.cv")).unwrap();
        scene.add_edge(s("cable")).unwrap();
        scene.set_edge_source(&s("cable"), Some(&s("osc.out"))).unwrap();
        scene.set_edge_target(&s("cable"), Some(&s("vca.in"))).unwrap();
        scene.add_edge(s("loose")).unwrap();
        scene.set_edge_target(&s("loose"), Some(&s("vca.cv"))).unwrap();
        scene
    }

    #[test]
    fn test_graph_snapshot_restores_endpoints() {
        let mut scene: GraphScene<u32, u32, NoVisuals> = GraphScene::new(NoVisuals);
        scene.add_node(1).unwrap();
        scene.add_node(2).unwrap();
        scene.add_edge(10).unwrap();
        scene.set_edge_source(&10, Some(&1)).unwrap();
        scene.set_edge_target(&10, Some(&2)).unwrap();
        scene.add_edge(11).unwrap();

        let snapshot = scene.snapshot();
        let restored = GraphScene::restore(&snapshot, NoVisuals).unwrap();

        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.edge_source(&10), Some(&1));
        assert_eq!(restored.edge_target(&10), Some(&2));
        assert!(restored.is_edge(&11));
        assert_eq!(restored.edge_source(&11), None);
        assert!(restored.check_consistency().is_ok());
    }

    #[test]
    fn test_pin_snapshot_restores_ownership_and_endpoints() {
        let scene = pin_scene();
        let snapshot = scene.snapshot();
        let restored: GraphPinScene<String, String, String, LayeredVisuals> =
            GraphPinScene::restore(&snapshot, LayeredVisuals::new()).unwrap();

        for edge in scene.edges() {
            assert_eq!(restored.edge_source(edge), scene.edge_source(edge));
            assert_eq!(restored.edge_target(edge), scene.edge_target(edge));
        }
        assert_eq!(restored.pin_node(&s("vca.cv")), Some(&s("vca")));
        assert!(restored.pin_widget(&s("osc.out")).is_some());
        assert!(restored.check_consistency().is_ok());
    }

    #[test]
    fn test_restore_rejects_dangling_endpoint() {
        let snapshot = GraphSnapshot {
            version: SNAPSHOT_VERSION,
            nodes: vec![1u32],
            edges: vec![EdgeRecord {
                edge: 5u32,
                source: Some(2),
                target: None,
            }],
            positions: Vec::new(),
        };
        let result = GraphScene::restore(&snapshot, NoVisuals);
        assert!(matches!(
            result,
            Err(SnapshotError::Scene(SceneError::UnknownNode(_)))
        ));
    }

    #[test]
    fn test_restore_rejects_future_version() {
        let snapshot: GraphSnapshot<u32, u32> = GraphSnapshot {
            version: SNAPSHOT_VERSION + 1,
            ..Default::default()
        };
        assert!(!snapshot.is_compatible());
        assert!(matches!(
            GraphScene::restore(&snapshot, NoVisuals),
            Err(SnapshotError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let snapshot = pin_scene().snapshot();
        save_to_file(&snapshot, &path).unwrap();
        let loaded: PinGraphSnapshot<String, String, String> = load_from_file(&path).unwrap();

        assert_eq!(loaded.nodes.len(), 2);
        assert_eq!(loaded.edges.len(), 2);
        let restored = Pins::restore(&loaded, NoVisuals).unwrap();
        assert_eq!(restored.pin_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<GraphSnapshot<u32, u32>, _> = load_from_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }

    #[test]
    fn test_pin_snapshot_keeps_node_positions() {
        let mut scene: GraphPinScene<String, String, String, LayeredVisuals> =
            GraphPinScene::new(LayeredVisuals::new());
        scene.add_node(s("osc")).unwrap();
        scene.add_pin(&s("osc"), s("osc.out")).unwrap();
        let widget = scene.node_widget(&s("osc")).unwrap();
        scene.widgets_mut().get_mut(widget).unwrap().position = (312.5, 48.0);

        let snapshot = scene.snapshot();
        assert_eq!(snapshot.nodes[0].position, Some((312.5, 48.0)));

        let restored = GraphPinScene::restore(&snapshot, LayeredVisuals::new()).unwrap();
        let moved = restored.node_widget(&s("osc")).unwrap();
        assert_eq!(restored.widgets().get(moved).unwrap().position, (312.5, 48.0));
    }

    #[test]
    fn test_graph_snapshot_keeps_node_positions() {
        let mut scene: GraphScene<String, String, LayeredVisuals> = GraphScene::new(LayeredVisuals::new());
        scene.add_node(s("a")).unwrap();
        let widget = scene.node_widget(&s("a")).unwrap();
        scene.widgets_mut().get_mut(widget).unwrap().position = (-20.0, 75.0);

        let restored = GraphScene::restore(&scene.snapshot(), LayeredVisuals::new()).unwrap();
        let moved = restored.node_widget(&s("a")).unwrap();
        assert_eq!(restored.widgets().get(moved).unwrap().position, (-20.0, 75.0));
    }

    #[test]
    fn test_snapshot_without_positions_still_loads() {
        let json = r#"{ "version": 1, "nodes": [{ "node": "n", "pins": ["p"] }], "edges": [] }"#;
        let snapshot: PinGraphSnapshot<String, String, String> = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.nodes[0].position, None);

        let restored = Pins::restore(&snapshot, NoVisuals).unwrap();
        assert_eq!(restored.pin_node(&s("p")), Some(&s("n")));
    }

    #[test]
    fn test_headless_snapshot_has_no_positions() {
        let snapshot = pin_scene().snapshot();
        assert!(snapshot.nodes.iter().all(|record| record.position.is_none()));
    }
}
