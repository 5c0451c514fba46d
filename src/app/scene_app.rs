//! Main application struct for the scene viewer
//!
//! Contains the SceneApp which implements eframe::App. It owns a pin scene
//! laid out by [`LayeredVisuals`] and draws whatever the widget tree holds.

use std::path::PathBuf;

use eframe::egui::{self, Align, Align2, FontId, Layout, RichText, Sense, Stroke, Vec2};
use tracing::{info, warn};

use super::config::AppConfig;
use super::theme;
use crate::persistence::{load_from_file, save_to_file, PinGraphSnapshot};
use crate::scene::{GraphPinScene, LayeredVisuals, SceneObject, NODE_HEADER_HEIGHT, NODE_WIDTH, PIN_SPACING};
use crate::widget::WidgetId;

/// The scene type shown by the viewer.
pub type ViewerScene = GraphPinScene<String, String, String, LayeredVisuals>;

/// Something the user asked for during a frame, applied after drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AddNode,
    AddPin(String),
    Select(String),
    RemoveNode { node: String, with_edges: bool },
    RemovePin { pin: String, with_edges: bool },
    RemoveEdge(String),
    /// Remember a pin as the source of the next connection.
    BeginConnection(String),
    /// Connect the remembered source pin to this one.
    FinishConnection(String),
    CancelConnection,
    Save,
    Load,
}

/// Main application state for the scene viewer
///
/// The scene's [`WidgetTree`](crate::widget::WidgetTree) only grows: removed
/// entities leave orphaned widgets behind. Loading a snapshot builds a new
/// scene and is the one way to start over with a compact tree.
pub struct SceneApp {
    scene: ViewerScene,
    next_node: u32,
    next_pin: u32,
    next_edge: u32,
    selected_node: Option<String>,
    pending_source: Option<String>,
    snapshot_path: String,
    status_message: Option<String>,
    status_failed: bool,
    theme_applied: bool,
}

fn fresh_key(counter: &mut u32, prefix: &str, taken: impl Fn(&String) -> bool) -> String {
    loop {
        *counter += 1;
        let key = format!("{prefix}{counter}");
        if !taken(&key) {
            return key;
        }
    }
}

impl SceneApp {
    /// Create a viewer with a small sample scene
    pub fn new(config: &AppConfig) -> Self {
        let mut app = Self {
            scene: GraphPinScene::new(LayeredVisuals::new()),
            next_node: 0,
            next_pin: 0,
            next_edge: 0,
            selected_node: None,
            pending_source: None,
            snapshot_path: config.snapshot_path.display().to_string(),
            status_message: None,
            status_failed: false,
            theme_applied: false,
        };
        app.populate_sample();
        app
    }

    fn populate_sample(&mut self) {
        let actions = [Action::AddNode, Action::AddNode];
        for action in actions {
            self.dispatch(action);
        }
        for node in ["node1", "node2"] {
            self.dispatch(Action::AddPin(node.to_string()));
            self.dispatch(Action::AddPin(node.to_string()));
        }
        self.dispatch(Action::BeginConnection("pin1".to_string()));
        self.dispatch(Action::FinishConnection("pin3".to_string()));
        self.selected_node = None;
        self.status_message = None;
    }

    pub fn scene(&self) -> &ViewerScene {
        &self.scene
    }

    pub fn selected_node(&self) -> Option<&String> {
        self.selected_node.as_ref()
    }

    pub fn pending_source(&self) -> Option<&String> {
        self.pending_source.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Applies an action and records the outcome in the status bar
    pub fn dispatch(&mut self, action: Action) {
        match self.apply(action) {
            Ok(Some(message)) => {
                self.status_message = Some(message);
                self.status_failed = false;
            }
            Ok(None) => {}
            Err(message) => {
                warn!(%message, "action failed");
                self.status_message = Some(message);
                self.status_failed = true;
            }
        }
    }

    fn apply(&mut self, action: Action) -> Result<Option<String>, String> {
        match action {
            Action::AddNode => {
                let node = fresh_key(&mut self.next_node, "node", |k| self.scene.is_node(k));
                self.scene.add_node(node.clone()).map_err(|e| e.to_string())?;
                self.selected_node = Some(node.clone());
                Ok(Some(format!("Added {node}")))
            }
            Action::AddPin(node) => {
                let pin = fresh_key(&mut self.next_pin, "pin", |k| self.scene.is_pin(k));
                self.scene
                    .add_pin(&node, pin.clone())
                    .map_err(|e| e.to_string())?;
                Ok(Some(format!("Added {pin} to {node}")))
            }
            Action::Select(node) => {
                self.selected_node = Some(node);
                Ok(None)
            }
            Action::RemoveNode { node, with_edges } => {
                let result = if with_edges {
                    self.scene.remove_node_with_edges(&node)
                } else {
                    self.scene.remove_node(&node)
                };
                result.map_err(|e| e.to_string())?;
                if self.selected_node.as_ref() == Some(&node) {
                    self.selected_node = None;
                }
                self.forget_stale_source();
                Ok(Some(format!("Removed {node}")))
            }
            Action::RemovePin { pin, with_edges } => {
                let result = if with_edges {
                    self.scene.remove_pin_with_edges(&pin)
                } else {
                    self.scene.remove_pin(&pin)
                };
                result.map_err(|e| e.to_string())?;
                self.forget_stale_source();
                Ok(Some(format!("Removed {pin}")))
            }
            Action::RemoveEdge(edge) => {
                self.scene.remove_edge(&edge).map_err(|e| e.to_string())?;
                Ok(Some(format!("Removed {edge}")))
            }
            Action::BeginConnection(pin) => {
                if !self.scene.is_pin(&pin) {
                    return Err(format!("{pin} is not a pin"));
                }
                self.pending_source = Some(pin.clone());
                Ok(Some(format!("Connecting from {pin}, pick a target pin")))
            }
            Action::FinishConnection(target) => {
                let Some(source) = self.pending_source.take() else {
                    return Err(String::from("No source pin chosen"));
                };
                if !self.scene.is_pin(&target) {
                    return Err(format!("{target} is not a pin"));
                }
                let edge = fresh_key(&mut self.next_edge, "edge", |k| self.scene.is_edge(k));
                self.scene.add_edge(edge.clone()).map_err(|e| e.to_string())?;
                self.scene
                    .set_edge_source(&edge, Some(&source))
                    .and_then(|_| self.scene.set_edge_target(&edge, Some(&target)))
                    .map_err(|e| e.to_string())?;
                Ok(Some(format!("Connected {source} to {target} with {edge}")))
            }
            Action::CancelConnection => {
                self.pending_source = None;
                Ok(None)
            }
            Action::Save => {
                let path = PathBuf::from(&self.snapshot_path);
                save_to_file(&self.scene.snapshot(), &path).map_err(|e| e.to_string())?;
                Ok(Some(format!("Saved to {}", path.display())))
            }
            Action::Load => {
                let path = PathBuf::from(&self.snapshot_path);
                let snapshot: PinGraphSnapshot<String, String, String> =
                    load_from_file(&path).map_err(|e| e.to_string())?;
                self.scene = GraphPinScene::restore(&snapshot, LayeredVisuals::new())
                    .map_err(|e| e.to_string())?;
                self.selected_node = None;
                self.pending_source = None;
                info!(nodes = self.scene.node_count(), "scene replaced from snapshot");
                Ok(Some(format!("Loaded {}", path.display())))
            }
        }
    }

    fn forget_stale_source(&mut self) {
        if let Some(pin) = &self.pending_source {
            if !self.scene.is_pin(pin) {
                self.pending_source = None;
            }
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Draw the top toolbar with scene-wide actions
    fn draw_toolbar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);

            ui.label(RichText::new("PIN SCENE")
                .size(18.0)
                .color(theme::text::PRIMARY)
                .strong());

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            if ui.button("+ Node").clicked() {
                actions.push(Action::AddNode);
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            ui.label(RichText::new("Snapshot").color(theme::text::SECONDARY));
            ui.text_edit_singleline(&mut self.snapshot_path);
            if ui.button("Save").clicked() {
                actions.push(Action::Save);
            }
            if ui.button("Load").clicked() {
                actions.push(Action::Load);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(format!(
                    "{} nodes • {} pins • {} edges",
                    self.scene.node_count(),
                    self.scene.pin_count(),
                    self.scene.edge_count()
                )).color(theme::text::SECONDARY).small());
            });
        });
    }

    /// Draw the side panel listing nodes, pins of the selected node and edges
    fn draw_inspector(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Nodes");
        let mut nodes: Vec<&String> = self.scene.nodes().collect();
        nodes.sort();
        for node in nodes {
            let selected = self.selected_node.as_ref() == Some(node);
            if ui.selectable_label(selected, node.as_str()).clicked() {
                actions.push(Action::Select(node.clone()));
            }
        }

        if let Some(node) = &self.selected_node {
            ui.separator();
            ui.label(RichText::new(node.as_str()).color(theme::text::ACCENT).strong());
            ui.horizontal(|ui| {
                if ui.button("+ Pin").clicked() {
                    actions.push(Action::AddPin(node.clone()));
                }
                if ui.button("Remove").clicked() {
                    actions.push(Action::RemoveNode { node: node.clone(), with_edges: false });
                }
                if ui.button("Remove + edges").clicked() {
                    actions.push(Action::RemoveNode { node: node.clone(), with_edges: true });
                }
            });

            let mut pins: Vec<&String> = self
                .scene
                .node_pins(node)
                .map(|pins| pins.iter().collect())
                .unwrap_or_default();
            pins.sort();
            for pin in pins {
                ui.horizontal(|ui| {
                    ui.label(pin.as_str());
                    match &self.pending_source {
                        None => {
                            if ui.small_button("from").clicked() {
                                actions.push(Action::BeginConnection(pin.clone()));
                            }
                        }
                        Some(_) => {
                            if ui.small_button("to").clicked() {
                                actions.push(Action::FinishConnection(pin.clone()));
                            }
                        }
                    }
                    if ui.small_button("✕").clicked() {
                        actions.push(Action::RemovePin { pin: pin.clone(), with_edges: false });
                    }
                    if ui.small_button("✕ + edges").clicked() {
                        actions.push(Action::RemovePin { pin: pin.clone(), with_edges: true });
                    }
                });
            }
        }

        if let Some(source) = &self.pending_source {
            ui.separator();
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Connecting from {source}")).color(theme::accent::WARNING));
                if ui.small_button("Cancel").clicked() {
                    actions.push(Action::CancelConnection);
                }
            });
        }

        ui.separator();
        ui.heading("Edges");
        let mut edges: Vec<&String> = self.scene.edges().collect();
        edges.sort();
        for edge in edges {
            let describe = |end: Option<&String>| end.map(String::as_str).unwrap_or("(detached)").to_string();
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{edge}: {} → {}",
                    describe(self.scene.edge_source(edge)),
                    describe(self.scene.edge_target(edge))
                ));
                if ui.small_button("✕").clicked() {
                    actions.push(Action::RemoveEdge(edge.clone()));
                }
            });
        }
    }

    /// Draw the canvas: connections first, then nodes with their pins
    fn draw_canvas(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let rect = ui.available_rect_before_wrap();
        let painter = ui.painter().clone();
        theme::draw_grid_background(&painter, rect);

        let origin = rect.min.to_vec2();
        let to_screen = |(x, y): (f32, f32)| egui::pos2(x, y) + origin;

        if let Some(layer) = self.scene.visuals().connection_layer() {
            let widgets = self.scene.widgets();
            for &connection in widgets.children(layer) {
                let Some(w) = widgets.get(connection) else { continue };
                let (Some(from), Some(to)) = (w.source_anchor, w.target_anchor) else {
                    continue;
                };
                painter.line_segment(
                    [to_screen(widgets.absolute_position(from)), to_screen(widgets.absolute_position(to))],
                    Stroke::new(2.0, theme::scene::CONNECTION),
                );
            }
        }

        let Some(main) = self.scene.visuals().main_layer() else {
            ui.allocate_rect(rect, Sense::hover());
            return;
        };

        let nodes: Vec<WidgetId> = self.scene.widgets().children(main).to_vec();
        for node_widget in nodes {
            let node = match self.scene.find_object(node_widget).and_then(SceneObject::as_node) {
                Some(node) => node.clone(),
                None => continue,
            };
            let pins: Vec<WidgetId> = self.scene.widgets().children(node_widget).to_vec();
            let min = to_screen(self.scene.widgets().absolute_position(node_widget));
            let size = Vec2::new(NODE_WIDTH, NODE_HEADER_HEIGHT + pins.len() as f32 * PIN_SPACING + 8.0);
            let node_rect = egui::Rect::from_min_size(min, size);

            let response = ui.interact(node_rect, ui.id().with(("node", node_widget.index())), Sense::click_and_drag());
            if response.dragged() {
                let delta = response.drag_delta();
                if let Some(w) = self.scene.widgets_mut().get_mut(node_widget) {
                    w.position.0 += delta.x;
                    w.position.1 += delta.y;
                }
            }
            if response.clicked() {
                actions.push(Action::Select(node.clone()));
            }

            let selected = self.selected_node.as_ref() == Some(&node);
            painter.rect_filled(node_rect, theme::ROUNDING, theme::scene::NODE_FILL);
            let header = egui::Rect::from_min_size(min, Vec2::new(NODE_WIDTH, NODE_HEADER_HEIGHT - 4.0));
            painter.rect_filled(header, theme::ROUNDING, theme::scene::NODE_HEADER);
            if selected {
                painter.rect_stroke(node_rect, theme::ROUNDING, Stroke::new(2.0, theme::scene::NODE_SELECTED));
            }
            painter.text(
                header.center(),
                Align2::CENTER_CENTER,
                node.as_str(),
                FontId::proportional(14.0),
                theme::text::PRIMARY,
            );

            for pin_widget in pins {
                let Some(SceneObject::Pin(pin)) = self.scene.find_object(pin_widget).cloned() else {
                    continue;
                };
                let center = to_screen(self.scene.widgets().absolute_position(pin_widget));
                let hit = egui::Rect::from_center_size(center, Vec2::splat(theme::scene::PIN_RADIUS * 3.0));
                let pin_response = ui.interact(hit, ui.id().with(("pin", pin_widget.index())), Sense::click());
                if pin_response.clicked() {
                    actions.push(match &self.pending_source {
                        None => Action::BeginConnection(pin.clone()),
                        Some(_) => Action::FinishConnection(pin.clone()),
                    });
                }

                let color = if self.pending_source.as_ref() == Some(&pin) {
                    theme::scene::PIN_PENDING
                } else {
                    theme::scene::PIN
                };
                painter.circle_filled(center, theme::scene::PIN_RADIUS, color);
                painter.text(
                    center - Vec2::new(10.0, 0.0),
                    Align2::RIGHT_CENTER,
                    pin.as_str(),
                    FontId::proportional(12.0),
                    theme::text::SECONDARY,
                );
            }
        }

        ui.allocate_rect(rect, Sense::hover());
    }

    /// Draw the bottom status bar
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);

            match &self.status_message {
                Some(message) if self.status_failed => {
                    ui.label(RichText::new(format!("⚠ {}", message))
                        .color(theme::accent::ERROR)
                        .small());
                }
                message => {
                    ui.label(RichText::new(message.as_deref().unwrap_or("Ready"))
                        .color(theme::text::SECONDARY)
                        .small());
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(concat!("pin_scene v", env!("CARGO_PKG_VERSION")))
                    .color(theme::text::DISABLED)
                    .small());
            });
        });
    }
}

impl eframe::App for SceneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme on first frame
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none()
                .fill(theme::background::PANEL)
                .inner_margin(egui::Margin::symmetric(0.0, 8.0)))
            .show(ctx, |ui| {
                self.draw_toolbar(ui, &mut actions);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::none()
                .fill(theme::background::PANEL)
                .inner_margin(egui::Margin::symmetric(0.0, 4.0)))
            .show(ctx, |ui| {
                self.draw_status_bar(ui);
            });

        egui::SidePanel::left("inspector")
            .default_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_inspector(ui, &mut actions);
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_canvas(ui, &mut actions);
            });

        // Apply deferred actions (to avoid borrow checker issues)
        for action in actions {
            self.dispatch(action);
        }
    }
}
