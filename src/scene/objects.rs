//! Object to widget association.
//!
//! Tracks which widget (if any) belongs to each scene object, in both
//! directions. Objects without a widget are still known to the map.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;

use crate::widget::WidgetId;

/// Bound shared by node, edge and pin key types.
pub trait SceneKey: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> SceneKey for T {}

/// A scene object tagged with its category.
///
/// The tag is part of the identity: a node and an edge built from equal
/// values are still different objects. Scenes without pins use the default
/// `P = Infallible`, which makes the `Pin` variant unconstructible.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SceneObject<N, E, P = Infallible> {
    Node(N),
    Edge(E),
    Pin(P),
}

impl<N, E, P> SceneObject<N, E, P> {
    /// Returns the node if this object is one.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            SceneObject::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the edge if this object is one.
    pub fn as_edge(&self) -> Option<&E> {
        match self {
            SceneObject::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the pin if this object is one.
    pub fn as_pin(&self) -> Option<&P> {
        match self {
            SceneObject::Pin(p) => Some(p),
            _ => None,
        }
    }
}

/// Two-way map between scene objects and their widgets.
#[derive(Clone, Debug)]
pub struct ObjectMap<K> {
    widgets: HashMap<K, Option<WidgetId>>,
    objects: HashMap<WidgetId, K>,
}

impl<K> Default for ObjectMap<K> {
    fn default() -> Self {
        Self {
            widgets: HashMap::new(),
            objects: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> ObjectMap<K> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object with an optional widget.
    ///
    /// Returns false if the object is already registered or the widget is
    /// already mapped to another object.
    pub fn add_object(&mut self, key: K, widget: Option<WidgetId>) -> bool {
        if self.widgets.contains_key(&key) {
            return false;
        }
        if let Some(w) = widget {
            if self.objects.contains_key(&w) {
                return false;
            }
            self.objects.insert(w, key.clone());
        }
        self.widgets.insert(key, widget);
        true
    }

    /// Unregisters an object and returns the widget it was mapped to.
    pub fn remove_object(&mut self, key: &K) -> Option<WidgetId> {
        let widget = self.widgets.remove(key).flatten();
        if let Some(w) = widget {
            self.objects.remove(&w);
        }
        widget
    }

    /// Returns the widget mapped to an object.
    pub fn find_widget(&self, key: &K) -> Option<WidgetId> {
        self.widgets.get(key).copied().flatten()
    }

    /// Returns the object a widget represents.
    pub fn find_object(&self, widget: WidgetId) -> Option<&K> {
        self.objects.get(&widget)
    }

    /// Returns true if the object is registered.
    pub fn is_object(&self, key: &K) -> bool {
        self.widgets.contains_key(key)
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
