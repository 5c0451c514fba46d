//! Incidence bookkeeping shared by both scene variants.
//!
//! `Incidence<T, E>` stores vertices of type `T` (nodes in [`GraphScene`],
//! pins in [`GraphPinScene`]) and edges of type `E`, each edge with an
//! optional source and target vertex. Every vertex keeps the edges leaving it
//! (outputs) and entering it (inputs) in insertion order. The two views are
//! kept symmetric by construction: endpoints are only ever changed through
//! [`Incidence::set_source`] and [`Incidence::set_target`].
//!
//! [`GraphScene`]: super::GraphScene
//! [`GraphPinScene`]: super::GraphPinScene

use std::collections::HashMap;

use super::error::SceneError;
use super::objects::SceneKey;

/// Edges incident to one vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Links<E> {
    /// Edges whose target is this vertex.
    pub inputs: Vec<E>,
    /// Edges whose source is this vertex.
    pub outputs: Vec<E>,
}

impl<E> Default for Links<E> {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl<E> Links<E> {
    /// Returns true if no edge touches the vertex.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

/// Current endpoints of one edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints<T> {
    pub source: Option<T>,
    pub target: Option<T>,
}

impl<T> Default for Endpoints<T> {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
        }
    }
}

#[derive(Clone, Copy)]
enum End {
    Source,
    Target,
}

/// Registry of vertices and edges with directed incidence.
#[derive(Clone, Debug)]
pub struct Incidence<T, E> {
    vertices: HashMap<T, Links<E>>,
    edges: HashMap<E, Endpoints<T>>,
}

impl<T, E> Default for Incidence<T, E> {
    fn default() -> Self {
        Self {
            vertices: HashMap::new(),
            edges: HashMap::new(),
        }
    }
}

impl<T: SceneKey, E: SceneKey> Incidence<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a vertex with empty incidence lists.
    ///
    /// Returns false if it is already registered.
    pub fn add_vertex(&mut self, vertex: T) -> bool {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex, Links::default());
        true
    }

    /// Unregisters a vertex and returns its incidence lists.
    ///
    /// Callers detach incident edges first; otherwise those edges would keep
    /// pointing at a vertex that no longer exists.
    pub fn remove_vertex(&mut self, vertex: &T) -> Option<Links<E>> {
        self.vertices.remove(vertex)
    }

    pub fn contains_vertex(&self, vertex: &T) -> bool {
        self.vertices.contains_key(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &T> {
        self.vertices.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Registers an unconnected edge. Returns false if it is already registered.
    pub fn add_edge(&mut self, edge: E) -> bool {
        if self.edges.contains_key(&edge) {
            return false;
        }
        self.edges.insert(edge, Endpoints::default());
        true
    }

    /// Unregisters an edge and returns the endpoints it still had.
    pub fn remove_edge(&mut self, edge: &E) -> Option<Endpoints<T>> {
        self.edges.remove(edge)
    }

    pub fn contains_edge(&self, edge: &E) -> bool {
        self.edges.contains_key(edge)
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.keys()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    pub fn source(&self, edge: &E) -> Option<&T> {
        self.edges.get(edge).and_then(|ends| ends.source.as_ref())
    }

    pub fn target(&self, edge: &E) -> Option<&T> {
        self.edges.get(edge).and_then(|ends| ends.target.as_ref())
    }

    /// Checks the preconditions of an endpoint change without applying it.
    ///
    /// Returns `Ok(false)` when the change would be a no-op.
    pub fn check_endpoint_change(
        &self,
        edge: &E,
        vertex: Option<&T>,
        is_source: bool,
        unknown_vertex: impl FnOnce(&T) -> SceneError,
    ) -> Result<bool, SceneError> {
        let ends = self
            .edges
            .get(edge)
            .ok_or_else(|| SceneError::unknown_edge(edge))?;
        if let Some(v) = vertex {
            if !self.vertices.contains_key(v) {
                return Err(unknown_vertex(v));
            }
        }
        let current = if is_source { &ends.source } else { &ends.target };
        Ok(current.as_ref() != vertex)
    }

    /// Moves the source of an edge.
    ///
    /// Returns `None` when `source` equals the current source (nothing
    /// changes), otherwise `Some(previous source)`. Both the edge and a
    /// non-empty `source` must be registered; callers validate with
    /// [`Incidence::check_endpoint_change`].
    pub fn set_source(&mut self, edge: &E, source: Option<T>) -> Option<Option<T>> {
        self.set_end(edge, source, End::Source)
    }

    /// Moves the target of an edge. See [`Incidence::set_source`].
    pub fn set_target(&mut self, edge: &E, target: Option<T>) -> Option<Option<T>> {
        self.set_end(edge, target, End::Target)
    }

    fn set_end(&mut self, edge: &E, vertex: Option<T>, end: End) -> Option<Option<T>> {
        let ends = self.edges.get_mut(edge)?;
        let slot = match end {
            End::Source => &mut ends.source,
            End::Target => &mut ends.target,
        };
        if *slot == vertex {
            return None;
        }
        if let Some(v) = &vertex {
            if !self.vertices.contains_key(v) {
                return None;
            }
        }

        let old = std::mem::replace(slot, vertex.clone());

        if let Some(links) = old.as_ref().and_then(|v| self.vertices.get_mut(v)) {
            let list = match end {
                End::Source => &mut links.outputs,
                End::Target => &mut links.inputs,
            };
            if let Some(pos) = list.iter().position(|e| e == edge) {
                list.remove(pos);
            }
        }
        if let Some(links) = vertex.as_ref().and_then(|v| self.vertices.get_mut(v)) {
            match end {
                End::Source => links.outputs.push(edge.clone()),
                End::Target => links.inputs.push(edge.clone()),
            }
        }

        Some(old)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn links(&self, vertex: &T) -> Option<&Links<E>> {
        self.vertices.get(vertex)
    }

    /// Edges entering the vertex, empty for unknown vertices.
    pub fn inputs(&self, vertex: &T) -> &[E] {
        self.vertices
            .get(vertex)
            .map(|l| l.inputs.as_slice())
            .unwrap_or(&[])
    }

    /// Edges leaving the vertex, empty for unknown vertices.
    pub fn outputs(&self, vertex: &T) -> &[E] {
        self.vertices
            .get(vertex)
            .map(|l| l.outputs.as_slice())
            .unwrap_or(&[])
    }

    /// Returns a fresh list of edges incident to a vertex.
    ///
    /// Input edges come first when both directions are requested.
    pub fn find_edges(&self, vertex: &T, allow_outputs: bool, allow_inputs: bool) -> Vec<E> {
        let mut found = Vec::new();
        if allow_inputs {
            found.extend_from_slice(self.inputs(vertex));
        }
        if allow_outputs {
            found.extend_from_slice(self.outputs(vertex));
        }
        found
    }

    /// Returns the edges going from `source` to `target`, in `source` output order.
    pub fn edges_between(&self, source: &T, target: &T) -> Vec<E> {
        let inputs = self.inputs(target);
        self.outputs(source)
            .iter()
            .filter(|e| inputs.contains(e))
            .cloned()
            .collect()
    }

    /// Verifies that incidence lists and edge endpoints agree.
    pub fn check(&self) -> Result<(), SceneError> {
        for (edge, ends) in &self.edges {
            for (end, list_of) in [
                (&ends.source, End::Source),
                (&ends.target, End::Target),
            ] {
                let Some(v) = end else { continue };
                let Some(links) = self.vertices.get(v) else {
                    return Err(SceneError::inconsistent(edge, "endpoint is not registered"));
                };
                let list = match list_of {
                    End::Source => &links.outputs,
                    End::Target => &links.inputs,
                };
                if list.iter().filter(|e| *e == edge).count() != 1 {
                    return Err(SceneError::inconsistent(
                        edge,
                        "edge not listed exactly once at its endpoint",
                    ));
                }
            }
        }

        for (vertex, links) in &self.vertices {
            for edge in &links.outputs {
                if self.source(edge) != Some(vertex) {
                    return Err(SceneError::inconsistent(edge, "listed as output of a non-source"));
                }
            }
            for edge in &links.inputs {
                if self.target(edge) != Some(vertex) {
                    return Err(SceneError::inconsistent(edge, "listed as input of a non-target"));
                }
            }
        }

        Ok(())
    }
}
