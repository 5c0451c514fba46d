//! Dark canvas theme for the scene viewer.
//!
//! Panels and widgets share one slate palette; the canvas palette in
//! [`scene`] reuses the accents so selection and pending states read the same
//! everywhere.

use egui::style::WidgetVisuals;
use egui::{Color32, Rounding, Stroke, Vec2};

/// Background colors
pub mod background {
    use super::Color32;

    /// Canvas and central panel
    pub const MAIN: Color32 = Color32::from_rgb(26, 26, 46);
    pub const GRID: Color32 = Color32::from_rgb(40, 40, 60);
    /// Toolbar, status bar and windows
    pub const PANEL: Color32 = Color32::from_rgb(35, 35, 55);
    pub const WIDGET: Color32 = Color32::from_rgb(45, 45, 70);
    pub const WIDGET_HOVERED: Color32 = Color32::from_rgb(55, 55, 85);
    pub const WIDGET_ACTIVE: Color32 = Color32::from_rgb(65, 65, 100);
    /// Text edits
    pub const INPUT: Color32 = Color32::from_rgb(20, 20, 35);
}

/// Text colors
pub mod text {
    use super::Color32;

    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
    pub const SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);
    pub const DISABLED: Color32 = Color32::from_rgb(100, 100, 115);
    /// Selected node name in the inspector
    pub const ACCENT: Color32 = Color32::from_rgb(130, 180, 255);
}

/// Accent colors
pub mod accent {
    use super::Color32;

    pub const PRIMARY: Color32 = Color32::from_rgb(66, 165, 245);
    /// Selection and connections in progress
    pub const WARNING: Color32 = Color32::from_rgb(255, 183, 77);
    pub const ERROR: Color32 = Color32::from_rgb(239, 83, 80);
}

/// Colors for scene widgets drawn on the canvas
pub mod scene {
    use super::{accent, background, Color32};

    pub const NODE_FILL: Color32 = background::WIDGET;
    pub const NODE_HEADER: Color32 = accent::PRIMARY;
    pub const NODE_SELECTED: Color32 = accent::WARNING;
    pub const PIN: Color32 = Color32::from_rgb(129, 199, 132);
    pub const PIN_PENDING: Color32 = accent::WARNING;
    pub const CONNECTION: Color32 = Color32::from_rgb(186, 104, 200);

    /// Pin radius in points
    pub const PIN_RADIUS: f32 = 5.0;
}

/// Distance between canvas grid lines
pub const GRID_SPACING: f32 = 20.0;

/// Rounding for nodes and windows
pub const ROUNDING: Rounding = Rounding::same(6.0);

/// Rounding for buttons and inputs
pub const ROUNDING_SMALL: Rounding = Rounding::same(4.0);

fn style_widget(state: &mut WidgetVisuals, fill: Color32, stroke: Stroke) {
    state.bg_fill = fill;
    state.weak_bg_fill = fill;
    state.fg_stroke = stroke;
    state.rounding = ROUNDING_SMALL;
}

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let visuals = &mut style.visuals;
    visuals.dark_mode = true;

    visuals.window_fill = background::PANEL;
    visuals.window_stroke = Stroke::new(1.0, background::WIDGET_ACTIVE);
    visuals.window_rounding = ROUNDING;
    visuals.panel_fill = background::PANEL;
    visuals.extreme_bg_color = background::INPUT;

    let widgets = &mut visuals.widgets;
    style_widget(&mut widgets.noninteractive, background::PANEL, Stroke::new(1.0, text::SECONDARY));
    style_widget(&mut widgets.inactive, background::WIDGET, Stroke::new(1.0, text::PRIMARY));
    style_widget(&mut widgets.hovered, background::WIDGET_HOVERED, Stroke::new(1.0, text::PRIMARY));
    style_widget(&mut widgets.active, background::WIDGET_ACTIVE, Stroke::new(1.5, accent::PRIMARY));
    style_widget(&mut widgets.open, background::WIDGET_ACTIVE, Stroke::new(1.0, text::PRIMARY));

    visuals.selection.bg_fill = accent::PRIMARY.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent::PRIMARY);
    visuals.hyperlink_color = text::ACCENT;

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(10.0, 4.0);

    ctx.set_style(style);
}

/// First grid line at or before `start`, aligned to [`GRID_SPACING`].
fn grid_start(start: f32) -> f32 {
    (start / GRID_SPACING).floor() * GRID_SPACING
}

/// Fill the canvas and draw its grid
pub fn draw_grid_background(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, background::MAIN);
    let stroke = Stroke::new(1.0, background::GRID);

    let mut x = grid_start(rect.left());
    while x <= rect.right() {
        painter.vline(x, rect.y_range(), stroke);
        x += GRID_SPACING;
    }
    let mut y = grid_start(rect.top());
    while y <= rect.bottom() {
        painter.hline(rect.x_range(), y, stroke);
        y += GRID_SPACING;
    }
}
