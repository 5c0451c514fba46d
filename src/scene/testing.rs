//! Hook implementation that records every call, for tests.

use std::fmt::Debug;
use std::hash::Hash;

use super::hooks::{GraphVisuals, PinVisuals, VisualContext};
use crate::widget::{WidgetId, WidgetKind, WidgetTree};

/// Records hook calls as readable strings and creates plain widgets under a
/// single root layer.
#[derive(Debug, Default)]
pub struct RecordingVisuals {
    pub calls: Vec<String>,
    pub root: Option<WidgetId>,
    /// When true, no widgets are created.
    pub headless: bool,
    /// Returned by every attach hook instead of a fresh widget.
    pub reuse: Option<WidgetId>,
    /// What `VisualContext` reported for the object inside each detach hook.
    pub detach_lookups: Vec<(String, Option<WidgetId>)>,
}

impl RecordingVisuals {
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Self::default()
        }
    }

    /// Drains the recorded calls.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }

    fn widget(&mut self, widgets: &mut WidgetTree, kind: WidgetKind, label: String) -> Option<WidgetId> {
        if self.headless {
            return None;
        }
        if let Some(shared) = self.reuse {
            return Some(shared);
        }
        let root = *self
            .root
            .get_or_insert_with(|| widgets.create(WidgetKind::Layer, "root"));
        let id = widgets.create(kind, label);
        widgets.add_child(root, id);
        Some(id)
    }
}

fn opt<T: Debug>(value: Option<&T>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "-".to_string(),
    }
}

impl<N, E> GraphVisuals<N, E> for RecordingVisuals
where
    N: Debug + Clone + Eq + Hash,
    E: Debug + Clone + Eq + Hash,
{
    fn attach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E>, node: &N) -> Option<WidgetId> {
        self.calls.push(format!("attach_node {node:?}"));
        self.widget(cx.widgets, WidgetKind::Node, format!("{node:?}"))
    }

    fn attach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E>, edge: &E) -> Option<WidgetId> {
        self.calls.push(format!("attach_edge {edge:?}"));
        self.widget(cx.widgets, WidgetKind::Connection, format!("{edge:?}"))
    }

    fn attach_edge_source_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        old: Option<&N>,
        new: Option<&N>,
    ) {
        self.calls
            .push(format!("source {edge:?} {} -> {}", opt(old), opt(new)));
    }

    fn attach_edge_target_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E>,
        edge: &E,
        old: Option<&N>,
        new: Option<&N>,
    ) {
        self.calls
            .push(format!("target {edge:?} {} -> {}", opt(old), opt(new)));
    }

    fn detach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E>, node: &N, widget: Option<WidgetId>) {
        self.calls.push(format!("detach_node {node:?}"));
        self.detach_lookups.push((format!("{node:?}"), cx.node_widget(node)));
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn detach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E>, edge: &E, widget: Option<WidgetId>) {
        self.calls.push(format!("detach_edge {edge:?}"));
        self.detach_lookups.push((format!("{edge:?}"), cx.edge_widget(edge)));
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn notify_node_added(&mut self, _cx: &mut VisualContext<'_, N, E>, node: &N, _widget: Option<WidgetId>) {
        self.calls.push(format!("node_added {node:?}"));
    }

    fn notify_edge_added(&mut self, _cx: &mut VisualContext<'_, N, E>, edge: &E, _widget: Option<WidgetId>) {
        self.calls.push(format!("edge_added {edge:?}"));
    }
}

impl<N, E, P> PinVisuals<N, E, P> for RecordingVisuals
where
    N: Debug + Clone + Eq + Hash,
    E: Debug + Clone + Eq + Hash,
    P: Debug + Clone + Eq + Hash,
{
    fn attach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, node: &N) -> Option<WidgetId> {
        self.calls.push(format!("attach_node {node:?}"));
        self.widget(cx.widgets, WidgetKind::Node, format!("{node:?}"))
    }

    fn attach_pin_widget(
        &mut self,
        cx: &mut VisualContext<'_, N, E, P>,
        node: &N,
        pin: &P,
    ) -> Option<WidgetId> {
        self.calls.push(format!("attach_pin {node:?} {pin:?}"));
        self.widget(cx.widgets, WidgetKind::Pin, format!("{pin:?}"))
    }

    fn attach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, edge: &E) -> Option<WidgetId> {
        self.calls.push(format!("attach_edge {edge:?}"));
        self.widget(cx.widgets, WidgetKind::Connection, format!("{edge:?}"))
    }

    fn attach_edge_source_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        old: Option<&P>,
        new: Option<&P>,
    ) {
        self.calls
            .push(format!("source {edge:?} {} -> {}", opt(old), opt(new)));
    }

    fn attach_edge_target_anchor(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        edge: &E,
        old: Option<&P>,
        new: Option<&P>,
    ) {
        self.calls
            .push(format!("target {edge:?} {} -> {}", opt(old), opt(new)));
    }

    fn detach_node_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, node: &N, widget: Option<WidgetId>) {
        self.calls.push(format!("detach_node {node:?}"));
        self.detach_lookups.push((format!("{node:?}"), cx.node_widget(node)));
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn detach_pin_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, pin: &P, widget: Option<WidgetId>) {
        self.calls.push(format!("detach_pin {pin:?}"));
        self.detach_lookups.push((format!("{pin:?}"), cx.pin_widget(pin)));
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn detach_edge_widget(&mut self, cx: &mut VisualContext<'_, N, E, P>, edge: &E, widget: Option<WidgetId>) {
        self.calls.push(format!("detach_edge {edge:?}"));
        self.detach_lookups.push((format!("{edge:?}"), cx.edge_widget(edge)));
        if let Some(w) = widget {
            cx.widgets.remove_from_parent(w);
        }
    }

    fn notify_pin_added(
        &mut self,
        _cx: &mut VisualContext<'_, N, E, P>,
        node: &N,
        pin: &P,
        _widget: Option<WidgetId>,
    ) {
        self.calls.push(format!("pin_added {node:?} {pin:?}"));
    }
}
